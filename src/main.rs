#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("`jsonstructure` CLI is only available with the `cli` feature");
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn main() {
    use jsonstructure::ValidationOptions;
    use std::{fs::File, io::Read, path::PathBuf, process};
    use structopt::StructOpt;

    #[derive(StructOpt)]
    #[structopt(name = "jsonstructure")]
    struct Cli {
        /// Allow '$' in property names (for validating meta-schema documents).
        #[structopt(long = "metaschema")]
        metaschema: bool,

        /// Enable processing of the $import and $importdefs keywords.
        #[structopt(long = "allowimport")]
        allow_import: bool,

        /// Enable conditional composition and validation keyword checking.
        #[structopt(long = "extended")]
        extended: bool,

        /// URI=FILE mapping consulted when resolving imports (may be specified multiple times).
        #[structopt(long = "importmap", number_of_values = 1)]
        import_map: Vec<String>,

        /// The JSON Structure schema document to validate.
        #[structopt(parse(from_os_str))]
        schema: PathBuf,

        /// A JSON instance to validate against the schema (may be specified multiple times).
        #[structopt(short = "i", long = "instance", parse(from_os_str))]
        instances: Vec<PathBuf>,
    }

    fn read_source(path: &PathBuf) -> String {
        let mut source = String::new();
        match File::open(path).and_then(|mut file| file.read_to_string(&mut source)) {
            Ok(_) => source,
            Err(error) => {
                eprintln!("Error reading {}: {}", path.display(), error);
                process::exit(1);
            }
        }
    }

    fn parse_json(path: &PathBuf, source: &str) -> serde_json::Value {
        match serde_json::from_str(source) {
            Ok(value) => value,
            Err(error) => {
                eprintln!("Error reading JSON file {}: {}", path.display(), error);
                process::exit(1);
            }
        }
    }

    let cli = Cli::from_args();
    let mut options = ValidationOptions::new();
    if cli.metaschema {
        options.with_metaschema_identifiers();
    }
    if cli.allow_import {
        options.with_imports();
    }
    if cli.extended {
        options.with_extended();
    }
    for mapping in &cli.import_map {
        match mapping.split_once('=') {
            Some((uri, file)) => {
                options.with_import_map(uri, file);
            }
            None => {
                eprintln!("Invalid --importmap format. Expected format: URI=FILE");
                process::exit(1);
            }
        }
    }

    let source = read_source(&cli.schema);
    let mut schema = parse_json(&cli.schema, &source);

    let mut success = true;
    let diagnostics = options.validate_schema(&mut schema, Some(&source));
    if diagnostics.is_empty() {
        println!("Schema is valid.");
    } else {
        success = false;
        println!("Schema is invalid:");
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            println!("{}. {}", index + 1, diagnostic);
        }
    }

    if !cli.instances.is_empty() {
        let validator = options.instance_validator(schema);
        for path in &cli.instances {
            let instance_source = read_source(path);
            let instance = parse_json(path, &instance_source);
            let diagnostics = validator.validate(&instance);
            let filename = path.to_string_lossy();
            if diagnostics.is_empty() {
                println!("{} - VALID", filename);
            } else {
                success = false;
                println!("{} - INVALID. Errors:", filename);
                for (index, diagnostic) in diagnostics.iter().enumerate() {
                    println!("{}. {}", index + 1, diagnostic);
                }
            }
        }
    }

    if !success {
        process::exit(1);
    }
}
