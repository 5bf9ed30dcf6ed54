use clap::Parser;
use colored::Colorize;
use texmath::prelude::*;
use texmath::options::Options;
use texmath::token::Span;

fn main() {
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Parse TeX math formulas and inspect the Texmath packages.
#[derive(Debug, Parser)]
#[command(
    name = "texmath",
    author = "The Texcraft Project",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity. Pass more than once for more output.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        let _ = env_logger::builder().filter_level(level).try_init();
        match self.command {
            Command::Parse(parse) => parse.run(),
            Command::Doc(doc) => doc.run(),
            Command::Packages(packages) => packages.run(),
        }
    }
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Parse formulas and print their trees.
    ///
    /// Each formula is parsed in the same session,
    ///     so a command defined by `\newcommand` in one formula
    ///     can be used in the formulas after it:
    ///
    ///     $ texmath parse -p base,newcommand '\newcommand{\half}{\frac12}' '\half'
    ///
    /// With `--file`, every non-empty line of the file is a formula.
    /// Parsing stops at the first error, which is printed as a diagnostic.
    Parse(Parse),

    /// Describe what a command means.
    ///
    /// The command is resolved with all packages active.
    /// The leading backslash can be omitted. Environment names are also accepted:
    ///
    ///     $ texmath doc frac
    ///     $ texmath doc pmatrix
    Doc(Doc),

    /// List the packages and the symbol maps each activates.
    Packages(Packages),
}

#[derive(Clone, Debug, Parser)]
struct Parse {
    /// Formulas to parse.
    formulas: Vec<String>,

    /// Packages to activate, in order.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "base,ams,color,newcommand,boldsymbol,unicode"
    )]
    packages: Vec<String>,

    /// Path to a JSON file with engine options, like `{"max_expansions": 100}`.
    #[arg(short, long)]
    options: Option<std::path::PathBuf>,

    /// Path to a file of formulas, one per line.
    #[arg(short, long)]
    file: Option<std::path::PathBuf>,
}

impl Parse {
    fn read_options(&self) -> Result<Options, String> {
        let path = match &self.options {
            None => return Ok(Default::default()),
            Some(path) => path,
        };
        let data = std::fs::read_to_string(path)
            .map_err(|err| format!["Failed to read {}: {err}", path.display()])?;
        serde_json::from_str(&data)
            .map_err(|err| format!["Invalid options file {}: {err}", path.display()])
    }

    fn read_formulas(&self) -> Result<Vec<String>, String> {
        let mut formulas = self.formulas.clone();
        if let Some(path) = &self.file {
            let data = std::fs::read_to_string(path)
                .map_err(|err| format!["Failed to read {}: {err}", path.display()])?;
            formulas.extend(
                data.lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(String::from),
            );
        }
        Ok(formulas)
    }

    fn run(&self) -> Result<(), String> {
        let options = self.read_options()?;
        let formulas = self.read_formulas()?;
        if formulas.is_empty() {
            return Err("No formulas provided".into());
        }
        let engine = texmath_packages::new_engine()
            .map_err(|err| err.to_string())?
            .with_options(options);
        let mut session = engine
            .session(self.packages.as_slice())
            .map_err(|err| err.to_string())?;
        for formula in &formulas {
            match session.parse_tree(formula) {
                Ok(tree) => println!("{tree}"),
                Err(err) => return Err(err.render(formula)),
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Doc {
    /// Name of the command or environment.
    name: String,
}

impl Doc {
    fn run(&self) -> Result<(), String> {
        let engine = texmath_packages::new_engine().map_err(|err| err.to_string())?;
        let session = engine
            .session(&texmath_packages::ALL_PACKAGES)
            .map_err(|err| err.to_string())?;
        let dispatcher = session.dispatcher();
        let name = self.name.strip_prefix('\\').unwrap_or(&self.name);
        let token = Token::new_control_sequence(name, Span::default());

        let resolution = [Category::Macro, Category::Character]
            .into_iter()
            .find_map(|category| dispatcher.resolve(&token, category).ok());
        let (heading, map, mapping) = match resolution {
            Some(resolution) => (
                format!["\\{name}"],
                resolution.map,
                resolution.mapping.into_owned(),
            ),
            None => {
                let found = dispatcher
                    .maps(Category::Environment)
                    .find_map(|map| map.get(name).map(|mapping| (map, mapping.clone())));
                match found {
                    None => return Err(format!["\\{name} is not defined in any package"]),
                    Some((map, mapping)) => (format!["{{{name}}}"], map, mapping),
                }
            }
        };
        println!("{}", heading.bold());
        println!("  symbol map: {}", map.name());
        println!("  mapping: {mapping}");
        if let Some(handler) = mapping.handler().or(map.handler()) {
            let doc = engine
                .handlers()
                .get(handler)
                .and_then(|h| h.doc())
                .unwrap_or("(undocumented)");
            println!("  handler {}: {doc}", handler.bold());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Packages {}

impl Packages {
    fn run(&self) -> Result<(), String> {
        let registry = texmath_packages::new_registry().map_err(|err| err.to_string())?;
        for configuration in registry.packages() {
            println!("{}", configuration.name().bold());
            for category in Category::ALL {
                let maps = configuration.maps(category);
                if !maps.is_empty() {
                    println!("  {category}: {}", maps.join(", "));
                }
                if let Some(fallback) = configuration.fallback(category) {
                    println!("  {category} fallback: {fallback}");
                }
            }
        }
        Ok(())
    }
}
