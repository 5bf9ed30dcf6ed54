/*!
Texmath unit testing library

This is a crate for writing unit tests for packages built on Texmath.
It is used throughout `texmath-packages`,
    so the unit tests there are good examples of what this crate can do.

Each test builds a fresh [`Engine`](texmath::vm::Engine) from a function supplied by the test writer,
    opens a session with the packages under test,
    and parses one or more formulas with the [`Recorder`](texmath::tree::Recorder) tree builder.

## Test types

### Tree tests

Run using [`run_tree_test`].

These tests verify that a formula produces a specific tree.
The tree is compared using its compact textual form, for example
```text
mfrac(mi(a) mrow(mi(b) mo(+) mi(c)))
```
for `\frac{a}{b+c}`.

### Parse equality tests

Run using [`run_parse_equality_test`].

These tests verify that two different formulas produce the same tree.
For example, a parse equality test can verify that
```tex
\newcommand{\half}{\frac{1}{2}}\half
```
and
```tex
\frac{1}{2}
```
produce the same output.
Each side is parsed in its own session.

### Failure tests

Run using [`run_failure_test`].

These tests verify that a specific formula fails to parse.

## The test suite macro

All of the test types can be run using the run functions described above.
However the preferred way to write a suite of unit tests is to use the [`test_suite`] macro.
*/

use texmath::error::ConfigError;
use texmath::options::Options;
use texmath::vm::{Engine, Session};

/// Option passed to a test runner.
pub enum TestOption<'a> {
    /// The engine is the result of invoking the provided static function.
    ///
    /// Overrides previous `Engine` or `EngineDyn` options.
    Engine(fn() -> Result<Engine, ConfigError>),

    /// The engine is the result of invoking the provided closure.
    ///
    /// Overrides previous `Engine` or `EngineDyn` options.
    EngineDyn(Box<dyn Fn() -> Result<Engine, ConfigError> + 'a>),

    /// Limits to install on the engine.
    ///
    /// Overrides previous `Options` options.
    Options(Options),
}

struct ResolvedOptions<'a> {
    engine: &'a dyn Fn() -> Result<Engine, ConfigError>,
    options: Option<Options>,
}

impl<'a> ResolvedOptions<'a> {
    fn new(options: &'a [TestOption<'a>]) -> Self {
        let mut resolved = Self {
            engine: &empty_engine,
            options: None,
        };
        for option in options {
            match option {
                TestOption::Engine(f) => resolved.engine = f,
                TestOption::EngineDyn(f) => resolved.engine = f,
                TestOption::Options(o) => resolved.options = Some(*o),
            }
        }
        resolved
    }
}

fn empty_engine() -> Result<Engine, ConfigError> {
    Engine::new(Default::default(), Default::default())
}

fn initialize_session(packages: &[&str], options: &ResolvedOptions) -> Session {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = match (options.engine)() {
        Ok(engine) => engine,
        Err(err) => panic!("failed to build the engine: {err}"),
    };
    if let Some(o) = options.options {
        engine = engine.with_options(o);
    }
    match engine.session(packages) {
        Ok(session) => session,
        Err(err) => panic!("failed to create a session for packages {packages:?}: {err}"),
    }
}

fn parse(session: &mut Session, input: &str) -> String {
    match session.parse_tree(input) {
        Ok(tree) => tree.to_string(),
        Err(err) => {
            println!("{}", err.render(input));
            panic!("failed to parse {input:?}");
        }
    }
}

/// Run a tree test.
///
/// The test passes if the input parses to a tree whose textual form is the expected string.
pub fn run_tree_test(input: &str, expected: &str, packages: &[&str], options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let mut session = initialize_session(packages, &options);
    let got = parse(&mut session, input);
    if got != expected {
        println!("Tree is different:");
        println!("------[got]-------");
        println!("{got}");
        println!("------[want]------");
        println!("{expected}");
        println!("------------------");
        panic!("Tree test failed");
    }
}

/// Run a parse equality test.
///
/// The test passes if the two provided formulas parse to the same tree.
pub fn run_parse_equality_test(lhs: &str, rhs: &str, packages: &[&str], options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let output_1 = parse(&mut initialize_session(packages, &options), lhs);
    let output_2 = parse(&mut initialize_session(packages, &options), rhs);
    if output_1 != output_2 {
        println!("Parse output is different:");
        println!("------[lhs]------");
        println!("{output_1}");
        println!("------[rhs]------");
        println!("{output_2}");
        println!("-----------------");
        panic!("Parse equality test failed");
    }
}

/// Run a failure test.
///
/// The test passes if parsing the provided input fails.
pub fn run_failure_test(input: &str, packages: &[&str], options: &[TestOption]) {
    let options = ResolvedOptions::new(options);
    let mut session = initialize_session(packages, &options);
    match session.parse_tree(input) {
        Ok(tree) => {
            println!("Parsing succeeded:");
            println!("{tree}");
            panic!("Failure test did not pass: parsing successful");
        }
        Err(err) => {
            println!("{}", err.render(input));
        }
    }
}

/// Macro to generate a suite of unit tests
///
/// The general use of this macros looks like this:
/// ```
/// # use texmath_testing::*;
/// # fn new_engine() -> Result<texmath::vm::Engine, texmath::error::ConfigError> {
/// #     texmath::vm::Engine::new(Default::default(), Default::default())
/// # }
/// test_suite![
///     packages(),
///     options(TestOption::Engine(new_engine)),
///     tree_tests(
///         (case_1, "", ""),
///     ),
///     parse_equality_tests(
///         (case_2, "", ""),
///     ),
///     failure_tests(
///         (case_3, r"\undefined"),
///     ),
/// ];
/// ```
///
/// The arguments to the macro are:
///
/// - `packages(package_1, ..., package_n)`: the packages to activate, in order.
///     This can be omitted, in which case it defaults to `packages("base")`.
///
/// - `options(option_1, option_2, ..., option_n)`: options to pass to the test runner.
///     This is a list of values of type [TestOption].
///     The options can be omitted, in which case they default to `options(TestOption::Engine(new_engine))`.
///     In this case `new_engine` is a static function in scope that builds the engine.
///
/// - `tree_tests(cases...)`: a list of tree test cases.
///     Each case is of the form (case name, input, expected tree).
///     The data here is fed into the [run_tree_test] test runner.
///
/// - `parse_equality_tests(cases...)`: a list of parse equality test cases.
///     Each case is of the form (case name, left hand side, right hand side).
///     The data here is fed into the [run_parse_equality_test] test runner.
///
/// - `failure_tests(cases...)`: a list of failure test cases.
///     Each case is of the form (case name, input).
///     The data here is fed into the [run_failure_test] test runner.
///
/// Only one `packages()` argument may be provided, and if provided it must be in the first position.
/// Only one `options()` argument may be provided, and if provided it must be in the first position
///     or after the `packages()` argument.
/// Zero or more of the other arguments may be provided, and in any order.
#[macro_export]
macro_rules! test_suite {
    ( packages $packages: tt, options $options: tt, tree_tests ( $( ($name: ident, $input: expr, $expected: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let input = $input;
                let expected = $expected;
                let packages: Vec<&str> = vec! $packages;
                let options = vec! $options;
                texmath_testing::run_tree_test(&input, &expected, &packages, &options);
            }
        )*
    );
    ( packages $packages: tt, options $options: tt, tree_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for tree_tests: must be a list of tuples (name, input, expected)");
    );
    ( packages $packages: tt, options $options: tt, parse_equality_tests ( $( ($name: ident, $lhs: expr, $rhs: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let lhs = $lhs;
                let rhs = $rhs;
                let packages: Vec<&str> = vec! $packages;
                let options = vec! $options;
                texmath_testing::run_parse_equality_test(&lhs, &rhs, &packages, &options);
            }
        )*
    );
    ( packages $packages: tt, options $options: tt, parse_equality_tests $test_body: tt $(,)? ) => (
        compile_error!("Invalid test cases for parse_equality_tests: must be a list of tuples (name, lhs, rhs)");
    );
    ( packages $packages: tt, options $options: tt, failure_tests ( $( ($name: ident, $input: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let input = $input;
                let packages: Vec<&str> = vec! $packages;
                let options = vec! $options;
                texmath_testing::run_failure_test(&input, &packages, &options);
            }
        )*
    );
    ( packages $packages: tt, options $options: tt, $test_kind: ident $test_cases: tt $(,)? ) => (
        compile_error!("Invalid keyword: test_suite! only accepts the following keywords: `packages`, `options`, `tree_tests`, `parse_equality_tests`, `failure_tests`");
    );
    ( packages $packages: tt, options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $(
            texmath_testing::test_suite![packages $packages, options $options, $test_kind $test_cases,];
        )+
    );
    ( packages $packages: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        texmath_testing::test_suite![packages $packages, options (texmath_testing::TestOption::Engine(new_engine)), $( $test_kind $test_cases, )+ ];
    );
    ( options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        texmath_testing::test_suite![packages ("base"), options $options, $( $test_kind $test_cases, )+ ];
    );
    ( $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        texmath_testing::test_suite![options (texmath_testing::TestOption::Engine(new_engine)), $( $test_kind $test_cases, )+ ];
    );
}
