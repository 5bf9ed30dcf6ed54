//! The boundary to the tree builder.
//!
//! Handlers do not build trees themselves: they call the methods of a [TreeBuilder].
//! The [Recorder] is a builder that records the calls as a [Tree],
//!     which has a compact textual form used in tests and by the command line tool.

use crate::mapping::{Attributes, Value};

/// The kind of a character node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    /// An identifier (`mi`).
    Identifier,
    /// A number (`mn`).
    Number,
    /// An operator (`mo`).
    Operator,
    /// Text (`mtext`).
    Text,
}

impl CharKind {
    pub fn tag(&self) -> &'static str {
        match self {
            CharKind::Identifier => "mi",
            CharKind::Number => "mn",
            CharKind::Operator => "mo",
            CharKind::Text => "mtext",
        }
    }
}

/// Position of a script relative to its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Superscript,
    Subscript,
}

/// A separator inside an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `&`
    Cell,
    /// `\\`
    Row,
    /// `\hline`
    HLine,
    /// `\hdashline`
    HDashLine,
}

/// Receiver of tree construction calls.
pub trait TreeBuilder {
    /// Append a character node to the current node.
    fn append_character(&mut self, kind: CharKind, glyph: &str, attributes: &Attributes);

    /// Open a generic node, e.g. `mfrac`.
    /// Children are appended until the matching [TreeBuilder::close_node].
    fn open_node(&mut self, name: &str, attributes: &Attributes);

    fn close_node(&mut self);

    /// Open a TeX atom of the provided class, e.g. `REL` for `\mathrel`.
    fn open_atom(&mut self, class: &str);

    fn close_atom(&mut self);

    /// Open a group, e.g. for `{`.
    fn open_group(&mut self);

    fn close_group(&mut self);

    fn begin_environment(&mut self, name: &str, params: &[Value]);

    fn end_environment(&mut self, name: &str);

    /// Attach the next completed item to the previous item as a script.
    ///
    /// Returns false, and does nothing, if the previous item already has a script in that
    ///     position or is itself still waiting for its script.
    /// A superscript made of primes can take one more superscript.
    fn script(&mut self, script: Script) -> bool;

    /// Start an infix node, e.g. the fraction of `a \over b`.
    ///
    /// The items of the current node so far become the first child of a new node.
    /// Items that follow go into its second child until [TreeBuilder::close_infix].
    /// With fences, the new node is placed in a group between the two fence characters.
    fn open_infix(&mut self, name: &str, attributes: &Attributes, fences: Option<[(&str, &Attributes); 2]>);

    fn close_infix(&mut self);

    fn separator(&mut self, separator: Separator);

    fn space(&mut self, width: &str);

    /// Set an attribute on the most recently completed item.
    ///
    /// Returns false if there is no such item.
    fn annotate_previous(&mut self, name: &str, value: Value) -> bool;
}

/// A node of a recorded tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Character {
        kind: CharKind,
        glyph: String,
        attributes: Attributes,
    },
    Element {
        name: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    Atom {
        class: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    Group(Vec<Node>),
    Environment {
        name: String,
        params: Vec<Value>,
        children: Vec<Node>,
    },
    Separator(Separator),
    Space(String),
}

impl Node {
    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element { children, .. }
            | Node::Atom { children, .. }
            | Node::Group(children)
            | Node::Environment { children, .. } => Some(children),
            _ => None,
        }
    }

    fn is_fence(&self) -> bool {
        match self {
            Node::Character { attributes, .. } => attributes.get("fence") == Some(&Value::Bool(true)),
            _ => false,
        }
    }

    fn is_primes(&self) -> bool {
        match self {
            Node::Character { glyph, .. } => {
                !glyph.is_empty() && glyph.chars().all(|c| "\u{2032}\u{2033}\u{2034}\u{2057}".contains(c))
            }
            _ => false,
        }
    }

    /// Returns true if this node is a script node that already has a script in the position.
    fn has_script(&self, script: Script) -> bool {
        let (name, children) = match self {
            Node::Element { name, children, .. } => (name.as_str(), children),
            _ => return false,
        };
        let (same, other) = match script {
            Script::Superscript => ("msup", "msub"),
            Script::Subscript => ("msub", "msup"),
        };
        if name == same {
            let primes = script == Script::Superscript && children.get(1).map_or(false, Node::is_primes);
            return !primes;
        }
        name == other && children.first().map_or(false, |base| base.has_script(script))
    }

    fn attributes_mut(&mut self) -> Option<&mut Attributes> {
        match self {
            Node::Character { attributes, .. }
            | Node::Element { attributes, .. }
            | Node::Atom { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

fn write_attributes(f: &mut std::fmt::Formatter<'_>, attributes: &Attributes) -> std::fmt::Result {
    if attributes.is_empty() {
        return Ok(());
    }
    let attributes: Vec<String> = attributes.iter().map(|(k, v)| format!["{k}={v}"]).collect();
    write![f, "[{}]", attributes.join(",")]
}

fn write_children(f: &mut std::fmt::Formatter<'_>, children: &[Node]) -> std::fmt::Result {
    write![f, "("]?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write![f, " "]?;
        }
        write![f, "{child}"]?;
    }
    write![f, ")"]
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Character {
                kind,
                glyph,
                attributes,
            } => {
                write![f, "{}", kind.tag()]?;
                write_attributes(f, attributes)?;
                write![f, "({glyph})"]
            }
            Node::Element {
                name,
                attributes,
                children,
            } => {
                write![f, "{name}"]?;
                write_attributes(f, attributes)?;
                write_children(f, children)
            }
            Node::Atom {
                class,
                attributes,
                children,
            } => {
                write![f, "TeXAtom[{class}]"]?;
                write_attributes(f, attributes)?;
                write_children(f, children)
            }
            Node::Group(children) => {
                write![f, "mrow"]?;
                write_children(f, children)
            }
            Node::Environment {
                name,
                params,
                children,
            } => {
                write![f, "{name}"]?;
                if !params.is_empty() {
                    let params: Vec<String> = params.iter().map(Value::to_string).collect();
                    write![f, "[{}]", params.join(",")]?;
                }
                write_children(f, children)
            }
            Node::Separator(Separator::Cell) => write![f, "&"],
            Node::Separator(Separator::Row) => write![f, "\\\\"],
            Node::Separator(Separator::HLine) => write![f, "hline"],
            Node::Separator(Separator::HDashLine) => write![f, "hdashline"],
            Node::Space(width) => write![f, "mspace({width})"],
        }
    }
}

/// A recorded tree: the top level list of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write![f, " "]?;
            }
            write![f, "{node}"]?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Frame {
    node: Node,
    /// If set, the frame closes itself once it has this many children.
    closes_after: Option<usize>,
    /// Appended to the node when the frame closes.
    closing: Option<Node>,
    /// The last child is a group that collapsed into its only child.
    sealed_last: bool,
}

impl Frame {
    fn new(node: Node, closes_after: Option<usize>) -> Frame {
        Frame {
            node,
            closes_after,
            closing: None,
            sealed_last: false,
        }
    }
}

/// A tree builder that records the calls it receives as a [Tree].
///
/// Groups with a single child collapse into that child.
/// Scripts are built as `msup` and `msub` nodes.
#[derive(Debug)]
pub struct Recorder {
    stack: Vec<Frame>,
    /// For each open infix node, the height of the stack before it was opened.
    infixes: Vec<usize>,
}

impl Default for Recorder {
    fn default() -> Self {
        Recorder {
            stack: vec![Frame::new(Node::Group(vec![]), None)],
            infixes: vec![],
        }
    }
}

impl Recorder {
    pub fn new() -> Recorder {
        Default::default()
    }

    /// Finish recording and return the tree.
    ///
    /// Nodes that are still open are closed.
    pub fn into_tree(mut self) -> Tree {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop().map(|frame| frame.node) {
            Some(Node::Group(nodes)) => Tree { nodes },
            _ => Tree::default(),
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.stack.last_mut()?.node.children_mut()
    }

    fn push_child(&mut self, node: Node, sealed: bool) {
        let complete = match self.stack.last_mut() {
            None => return,
            Some(frame) => {
                frame.sealed_last = sealed;
                match frame.node.children_mut() {
                    None => false,
                    Some(children) => {
                        children.push(node);
                        frame.closes_after == Some(children.len())
                    }
                }
            }
        };
        if complete {
            self.close();
        }
    }

    fn open(&mut self, node: Node, closes_after: Option<usize>) {
        self.stack.push(Frame::new(node, closes_after));
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(Frame {
            mut node, closing, ..
        }) = self.stack.pop()
        {
            if let (Some(closing), Some(children)) = (closing, node.children_mut()) {
                children.push(closing);
            }
            match node {
                Node::Group(mut children) if children.len() == 1 => {
                    self.push_child(children.remove(0), true)
                }
                node => self.push_child(node, false),
            }
        }
    }

    /// Close frames until the innermost frame is not waiting for a script.
    fn close_pending_scripts(&mut self) {
        while let Some(Frame {
            closes_after: Some(_),
            ..
        }) = self.stack.last()
        {
            if self.stack.len() <= 1 {
                return;
            }
            self.close();
        }
    }
}

impl TreeBuilder for Recorder {
    fn append_character(&mut self, kind: CharKind, glyph: &str, attributes: &Attributes) {
        self.push_child(
            Node::Character {
                kind,
                glyph: glyph.to_string(),
                attributes: attributes.clone(),
            },
            false,
        );
    }

    fn open_node(&mut self, name: &str, attributes: &Attributes) {
        self.open(
            Node::Element {
                name: name.to_string(),
                attributes: attributes.clone(),
                children: vec![],
            },
            None,
        );
    }

    fn close_node(&mut self) {
        self.close_pending_scripts();
        self.close();
    }

    fn open_atom(&mut self, class: &str) {
        self.open(
            Node::Atom {
                class: class.to_string(),
                attributes: Default::default(),
                children: vec![],
            },
            None,
        );
    }

    fn close_atom(&mut self) {
        self.close_pending_scripts();
        self.close();
    }

    fn open_group(&mut self) {
        self.open(Node::Group(vec![]), None);
    }

    fn close_group(&mut self) {
        self.close_pending_scripts();
        self.close();
    }

    fn begin_environment(&mut self, name: &str, params: &[Value]) {
        self.open(
            Node::Environment {
                name: name.to_string(),
                params: params.to_vec(),
                children: vec![],
            },
            None,
        );
    }

    fn end_environment(&mut self, _: &str) {
        self.close_pending_scripts();
        self.close();
    }

    fn script(&mut self, script: Script) -> bool {
        let frame = match self.stack.last_mut() {
            None => return false,
            Some(frame) => frame,
        };
        if frame.closes_after.is_some() {
            return false;
        }
        let sealed = frame.sealed_last;
        let children = match frame.node.children_mut() {
            None => return false,
            Some(children) => children,
        };
        if !sealed && children.last().map_or(false, |previous| previous.has_script(script)) {
            return false;
        }
        let base = children.pop().unwrap_or(Node::Group(vec![]));
        let name = match script {
            Script::Superscript => "msup",
            Script::Subscript => "msub",
        };
        self.open(
            Node::Element {
                name: name.to_string(),
                attributes: Default::default(),
                children: vec![base],
            },
            Some(2),
        );
        true
    }

    fn open_infix(&mut self, name: &str, attributes: &Attributes, fences: Option<[(&str, &Attributes); 2]>) {
        self.close_pending_scripts();
        // Only the current cell is taken, without the opening fence of a fenced group.
        let items = match self.children_mut() {
            None => vec![],
            Some(children) => {
                let mut start = children
                    .iter()
                    .rposition(|child| matches!(child, Node::Separator(_)))
                    .map_or(0, |i| i + 1);
                if children.get(start).map_or(false, Node::is_fence) {
                    start += 1;
                }
                children.split_off(start)
            }
        };
        let first = match items.len() {
            1 => items.into_iter().next().unwrap_or(Node::Group(vec![])),
            _ => Node::Group(items),
        };
        self.infixes.push(self.stack.len());
        if let Some([open, close]) = fences {
            let fence = |(glyph, attributes): (&str, &Attributes)| Node::Character {
                kind: CharKind::Operator,
                glyph: glyph.to_string(),
                attributes: attributes.clone(),
            };
            let mut frame = Frame::new(Node::Group(vec![fence(open)]), None);
            frame.closing = Some(fence(close));
            self.stack.push(frame);
        }
        self.open(
            Node::Element {
                name: name.to_string(),
                attributes: attributes.clone(),
                children: vec![first],
            },
            None,
        );
        self.open(Node::Group(vec![]), None);
    }

    fn close_infix(&mut self) {
        let height = match self.infixes.pop() {
            None => return,
            Some(height) => height,
        };
        self.close_pending_scripts();
        while self.stack.len() > height.max(1) {
            self.close();
        }
    }

    fn separator(&mut self, separator: Separator) {
        self.close_pending_scripts();
        self.push_child(Node::Separator(separator), false);
    }

    fn space(&mut self, width: &str) {
        self.push_child(Node::Space(width.to_string()), false);
    }

    fn annotate_previous(&mut self, name: &str, value: Value) -> bool {
        let attributes = self
            .children_mut()
            .and_then(|children| children.last_mut())
            .and_then(Node::attributes_mut);
        match attributes {
            None => false,
            Some(attributes) => {
                attributes.insert(name.to_string(), value);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(recorder: &mut Recorder, glyph: &str) {
        recorder.append_character(CharKind::Identifier, glyph, &Default::default());
    }

    #[test]
    fn characters() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "\u{3b1}");
        recorder.append_character(CharKind::Operator, "+", &Default::default());
        mi(&mut recorder, "\u{3b2}");
        assert_eq!(recorder.into_tree().to_string(), "mi(\u{3b1}) mo(+) mi(\u{3b2})");
    }

    #[test]
    fn single_child_group_collapses() {
        let mut recorder = Recorder::new();
        recorder.open_group();
        mi(&mut recorder, "x");
        recorder.close_group();
        recorder.open_group();
        mi(&mut recorder, "y");
        mi(&mut recorder, "z");
        recorder.close_group();
        assert_eq!(recorder.into_tree().to_string(), "mi(x) mrow(mi(y) mi(z))");
    }

    #[test]
    fn scripts() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "x");
        recorder.script(Script::Superscript);
        recorder.append_character(CharKind::Number, "2", &Default::default());
        mi(&mut recorder, "y");
        assert_eq!(
            recorder.into_tree().to_string(),
            "msup(mi(x) mn(2)) mi(y)"
        );
    }

    #[test]
    fn script_of_group() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "x");
        recorder.script(Script::Subscript);
        recorder.open_group();
        mi(&mut recorder, "i");
        mi(&mut recorder, "j");
        recorder.close_group();
        assert_eq!(
            recorder.into_tree().to_string(),
            "msub(mi(x) mrow(mi(i) mi(j)))"
        );
    }

    #[test]
    fn script_without_base() {
        let mut recorder = Recorder::new();
        recorder.script(Script::Superscript);
        mi(&mut recorder, "x");
        assert_eq!(recorder.into_tree().to_string(), "msup(mrow() mi(x))");
    }

    fn mn(recorder: &mut Recorder, glyph: &str) {
        recorder.append_character(CharKind::Number, glyph, &Default::default());
    }

    #[test]
    fn double_scripts_are_refused() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "x");
        assert!(recorder.script(Script::Superscript));
        assert!(!recorder.script(Script::Superscript));
        mn(&mut recorder, "2");
        assert!(!recorder.script(Script::Superscript));
        assert!(recorder.script(Script::Subscript));
        mn(&mut recorder, "1");
        assert!(!recorder.script(Script::Subscript));
        assert_eq!(
            recorder.into_tree().to_string(),
            "msub(msup(mi(x) mn(2)) mn(1))"
        );
    }

    #[test]
    fn scripts_of_braced_scripts_are_allowed() {
        let mut recorder = Recorder::new();
        recorder.open_group();
        mi(&mut recorder, "x");
        assert!(recorder.script(Script::Superscript));
        mn(&mut recorder, "2");
        recorder.close_group();
        assert!(recorder.script(Script::Superscript));
        mn(&mut recorder, "3");
        assert_eq!(
            recorder.into_tree().to_string(),
            "msup(msup(mi(x) mn(2)) mn(3))"
        );
    }

    #[test]
    fn primes_take_one_more_superscript() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "f");
        assert!(recorder.script(Script::Superscript));
        recorder.append_character(CharKind::Operator, "\u{2032}", &Default::default());
        assert!(recorder.script(Script::Superscript));
        mn(&mut recorder, "2");
        assert_eq!(
            recorder.into_tree().to_string(),
            "msup(msup(mi(f) mo(\u{2032})) mn(2))"
        );
    }

    #[test]
    fn infix() {
        let mut recorder = Recorder::new();
        mi(&mut recorder, "a");
        mi(&mut recorder, "b");
        recorder.open_infix("mfrac", &Default::default(), None);
        mi(&mut recorder, "c");
        recorder.close_infix();
        assert_eq!(
            recorder.into_tree().to_string(),
            "mfrac(mrow(mi(a) mi(b)) mi(c))"
        );
    }

    #[test]
    fn fenced_infix_in_group() {
        let mut recorder = Recorder::new();
        recorder.open_group();
        mi(&mut recorder, "n");
        let none = Attributes::new();
        recorder.open_infix("mfrac", &Default::default(), Some([("(", &none), (")", &none)]));
        mi(&mut recorder, "k");
        recorder.close_infix();
        recorder.close_group();
        assert_eq!(
            recorder.into_tree().to_string(),
            "mrow(mo(() mfrac(mi(n) mi(k)) mo()))"
        );
    }

    #[test]
    fn infix_takes_the_current_cell() {
        let mut recorder = Recorder::new();
        recorder.begin_environment("matrix", &[]);
        mi(&mut recorder, "x");
        recorder.separator(Separator::Cell);
        mi(&mut recorder, "a");
        recorder.open_infix("mfrac", &Default::default(), None);
        mi(&mut recorder, "b");
        recorder.close_infix();
        recorder.end_environment("matrix");
        assert_eq!(
            recorder.into_tree().to_string(),
            "matrix(mi(x) & mfrac(mi(a) mi(b)))"
        );
    }

    #[test]
    fn annotate_previous() {
        let mut recorder = Recorder::new();
        assert!(!recorder.annotate_previous("movablelimits", Value::Bool(false)));
        recorder.append_character(CharKind::Operator, "\u{2211}", &Default::default());
        assert!(recorder.annotate_previous("movablelimits", Value::Bool(false)));
        assert_eq!(
            recorder.into_tree().to_string(),
            "mo[movablelimits=false](\u{2211})"
        );
    }

    #[test]
    fn annotate_atom() {
        let mut recorder = Recorder::new();
        recorder.open_atom("OP");
        mi(&mut recorder, "x");
        recorder.close_atom();
        assert!(recorder.annotate_previous("movablelimits", Value::Bool(false)));
        assert_eq!(
            recorder.into_tree().to_string(),
            "TeXAtom[OP][movablelimits=false](mi(x))"
        );
    }

    #[test]
    fn environment() {
        let mut recorder = Recorder::new();
        recorder.begin_environment("matrix", &[Value::Str("c".into())]);
        mi(&mut recorder, "a");
        recorder.separator(Separator::Cell);
        mi(&mut recorder, "b");
        recorder.separator(Separator::Row);
        mi(&mut recorder, "c");
        recorder.end_environment("matrix");
        assert_eq!(
            recorder.into_tree().to_string(),
            r"matrix[c](mi(a) & mi(b) \\ mi(c))"
        );
    }

    #[test]
    fn unclosed_nodes_are_closed() {
        let mut recorder = Recorder::new();
        recorder.open_node("mfrac", &Default::default());
        mi(&mut recorder, "a");
        assert_eq!(recorder.into_tree().to_string(), "mfrac(mi(a))");
    }
}
