//! The work-list of a parse.
//!
//! The work-list is a stack of frames.
//! A token frame holds a sequence of pending tokens and the expansion depth they were produced at.
//! An action frame holds a deferred operation, such as closing the group opened for an argument.
//!
//! Tokens are read one at a time from the top frame.
//! Readers that capture arguments use [Stack::next_token], which never crosses an action frame:
//!     an argument that would need tokens from beyond an action frame is missing.

use super::Action;
use crate::token::Token;

#[derive(Debug)]
enum Frame {
    /// Tokens, stored in reverse order so that the next token is at the end.
    Tokens { tokens: Vec<Token>, depth: usize },
    Action(Action),
}

/// An item popped from the work-list.
#[derive(Debug)]
pub(crate) enum Item {
    Token(Token, usize),
    Action(Action),
}

#[derive(Debug, Default)]
pub(crate) struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn new(tokens: Vec<Token>) -> Stack {
        let mut stack = Stack { frames: vec![] };
        stack.push_tokens(tokens, 0);
        stack
    }

    /// Pushes tokens so that the first token in the vector is read next.
    pub fn push_tokens(&mut self, mut tokens: Vec<Token>, depth: usize) {
        if tokens.is_empty() {
            return;
        }
        tokens.reverse();
        self.frames.push(Frame::Tokens { tokens, depth });
    }

    pub fn push_action(&mut self, action: Action) {
        self.frames.push(Frame::Action(action));
    }

    /// Pops the next token or action.
    pub fn pop(&mut self) -> Option<Item> {
        loop {
            match self.frames.last_mut()? {
                Frame::Tokens { tokens, depth } => {
                    let depth = *depth;
                    match tokens.pop() {
                        Some(token) => return Some(Item::Token(token, depth)),
                        None => {
                            self.frames.pop();
                        }
                    }
                }
                Frame::Action(_) => {
                    if let Some(Frame::Action(action)) = self.frames.pop() {
                        return Some(Item::Action(action));
                    }
                }
            }
        }
    }

    fn drop_empty_frames(&mut self) {
        while let Some(Frame::Tokens { tokens, .. }) = self.frames.last() {
            if !tokens.is_empty() {
                return;
            }
            self.frames.pop();
        }
    }

    /// Pops the next token, unless the next item is an action or the stack is empty.
    pub fn next_token(&mut self) -> Option<Token> {
        self.drop_empty_frames();
        match self.frames.last_mut() {
            Some(Frame::Tokens { tokens, .. }) => tokens.pop(),
            _ => None,
        }
    }

    /// Returns the next token without popping it, under the same conditions as [Stack::next_token].
    pub fn peek_token(&mut self) -> Option<&Token> {
        self.drop_empty_frames();
        match self.frames.last() {
            Some(Frame::Tokens { tokens, .. }) => tokens.last(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::lexer;

    fn text(stack: &mut Stack) -> String {
        let mut s = String::new();
        while let Some(token) = stack.next_token() {
            s.push_str(&token.to_string());
        }
        s
    }

    #[test]
    fn tokens_are_read_in_order() {
        let mut stack = Stack::new(lexer::lex("abc").unwrap());
        assert_eq!(text(&mut stack), "abc");
        assert!(stack.pop().is_none());
    }

    #[test]
    fn pushed_tokens_are_read_first() {
        let mut stack = Stack::new(lexer::lex("ab").unwrap());
        assert_eq!(stack.next_token().map(|t| t.to_string()), Some("a".to_string()));
        stack.push_tokens(lexer::lex("xy").unwrap(), 1);
        match stack.pop() {
            Some(Item::Token(token, depth)) => {
                assert_eq!(token.to_string(), "x");
                assert_eq!(depth, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(text(&mut stack), "yb");
    }

    #[test]
    fn token_reads_stop_at_actions() {
        let mut stack = Stack::new(lexer::lex("ab").unwrap());
        stack.push_action(Action::CloseNode);
        stack.push_tokens(lexer::lex("x").unwrap(), 0);
        assert_eq!(text(&mut stack), "x");
        assert!(stack.peek_token().is_none());
        assert!(matches!(stack.pop(), Some(Item::Action(Action::CloseNode))));
        assert_eq!(text(&mut stack), "ab");
    }

    #[test]
    fn empty_frames_are_skipped() {
        let mut stack = Stack::new(lexer::lex("a").unwrap());
        stack.push_tokens(vec![], 3);
        assert_eq!(stack.peek_token().map(|t| t.to_string()), Some("a".to_string()));
    }
}
