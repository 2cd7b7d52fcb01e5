//! Runs a parsed command against the library and prints the outcome.

use crate::cli::{Command, ScopeArgs};
use crate::prompt::TerminalPrompter;
use boiler_config::Config;
use boiler_index::{Kind, extension_of};
use boiler_library::error::{ErrorKind, Result};
use boiler_library::{
    AddRequest, Details, Entry, Info, Library, Prompter, Scaffold, Scope, StoreAs, StoreRequest, init_snippet,
    init_stack, prompt_error,
};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

const DEFAULT_STACK_NAME: &str = "my-stack";
const DEFAULT_SNIPPET_FILE: &str = "snippet.bl";

impl From<ScopeArgs> for Scope {
    fn from(args: ScopeArgs) -> Self {
        match (args.snippets, args.stacks) {
            (true, false) => Self::Snippets,
            (false, true) => Self::Stacks,
            _ => Self::All,
        }
    }
}

pub fn run(command: Command, config_file: Option<&Path>) -> Result<()> {
    let config = Config::load(config_file).or_raise(|| ErrorKind::Config)?;
    tracing::debug!(
        file = ?config_file.map(Path::to_path_buf).or_else(Config::default_file),
        store = %config.paths.store.display(),
        "Loaded configuration"
    );
    let mut prompter = TerminalPrompter::stdio();
    match command {
        Command::Store { path, name, snippet, stack } => {
            let kind = match (snippet, stack) {
                (true, _) => StoreAs::Snippet,
                (_, true) => StoreAs::Stack,
                _ => StoreAs::Auto,
            };
            let mut request = StoreRequest::new(path.unwrap_or_else(|| PathBuf::from("."))).with_kind(kind);
            if let Some(name) = name {
                request = request.with_name(name);
            }
            let stored = Library::open(config)?.store(&request, &mut prompter)?;
            println!("Stored {} '{}' ({})", stored.entry.kind, stored.entry.key, stored.decision);
        },
        Command::Add { resource, to, force } => {
            let request = AddRequest::new(resource, to.unwrap_or_else(|| PathBuf::from("."))).force(force);
            let added = Library::open(config)?.add(&request, &mut prompter)?;
            println!("Added {} '{}' to {}", added.entry.kind, added.entry.key, added.destination.display());
            if added.entry.kind == Kind::Stack {
                println!("  {} file(s) copied", added.files);
            }
        },
        Command::Clean { resource: Some(resource), .. } => {
            let removed = Library::open(config)?.clean(&resource, &mut prompter)?;
            println!("Removed {} '{}'", removed.kind, removed.key);
        },
        Command::Clean { resource: None, all, scope } => {
            let scope = match all {
                true => Scope::All,
                false => Scope::from(scope),
            };
            let cleaned = Library::open(config)?.clean_all(scope, &mut prompter)?;
            println!("Removed {} snippet(s) and {} stack(s)", cleaned.snippets, cleaned.stacks);
        },
        Command::Ls { scope } => print_entries(&Library::open(config)?.list(scope.into()), "No resources stored"),
        Command::Search { query, scope } => {
            let found = Library::open(config)?.search(&query, scope.into());
            print_entries(&found, &format!("Nothing matches '{query}'"));
        },
        Command::Info { resource } => print_info(&Library::open(config)?.info(&resource, &mut prompter)?),
        Command::Init { snippet, file, yes } => {
            let path = match snippet || file.is_some() {
                true => init_snippet_file(&config, file, yes, &mut prompter)?,
                false => init_stack_config(yes, &mut prompter)?,
            };
            println!("Created {}", path.display());
        },
        Command::Path => {
            let root = config.root().or_raise(|| ErrorKind::Config)?;
            println!("root:     {}", root.display());
            println!("store:    {}", config.paths.store.display());
            println!("snippets: {}", config.paths.snippets.display());
            println!("stacks:   {}", config.paths.stacks.display());
            println!("index:    {}", config.index_path().display());
        },
    }
    Ok(())
}

fn scaffold(default_name: &str, yes: bool, prompter: &mut dyn Prompter) -> Result<Scaffold> {
    match yes {
        true => Ok(Scaffold::defaults(default_name)),
        false => Scaffold::prompt(default_name, prompter),
    }
}

fn init_stack_config(yes: bool, prompter: &mut dyn Prompter) -> Result<PathBuf> {
    let dir = std::env::current_dir().or_raise(|| ErrorKind::Io("cannot read the current directory".to_string()))?;
    let default_name = dir.file_name().and_then(|name| name.to_str()).unwrap_or(DEFAULT_STACK_NAME).to_string();
    init_stack(&dir, &scaffold(&default_name, yes, prompter)?)
}

fn init_snippet_file(config: &Config, file: Option<String>, yes: bool, prompter: &mut dyn Prompter) -> Result<PathBuf> {
    let file = match (file, yes) {
        (Some(file), _) => file,
        (None, true) => DEFAULT_SNIPPET_FILE.to_string(),
        (None, false) => prompter
            .input("Filename (e.g. handler.js, Dockerfile, .gitignore)", Some(DEFAULT_SNIPPET_FILE))
            .map_err(prompt_error)?,
    };
    let path = PathBuf::from(file.trim());
    let artifact = match (extension_of(file.trim()).is_some(), yes) {
        (false, false) => {
            let answer = prompter.input("Artifact type (for comment style)", Some("default")).map_err(prompt_error)?;
            Some(answer)
        },
        _ => None,
    };
    let default_name = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default().to_string();
    init_snippet(config, &path, artifact.as_deref(), &scaffold(&default_name, yes, prompter)?)
}

fn print_entries(entries: &[Entry], empty: &str) {
    if entries.is_empty() {
        println!("{empty}");
        return;
    }
    for (kind, heading) in [(Kind::Snippet, "Snippets"), (Kind::Stack, "Stacks")] {
        let keys: Vec<&str> = entries.iter().filter(|e| e.kind == kind).map(|e| e.key.as_str()).collect();
        if keys.is_empty() {
            continue;
        }
        println!("{heading}:");
        for key in keys {
            println!("  {key}");
        }
    }
}

fn print_info(info: &Info) {
    println!("{}: {}", info.entry.kind, info.entry.key);
    println!("  path:     {}", info.entry.path.display());
    println!("  size:     {} bytes", info.size);
    if let Some(modified) = info.modified.and_then(|m| m.format(&Rfc3339).ok()) {
        println!("  modified: {modified}");
    }
    match &info.details {
        Details::Snippet(metadata) => {
            if let Some(author) = &metadata.author {
                println!("  author:   {author}");
            }
            if let Some(description) = &metadata.description {
                println!("  desc:     {description}");
            }
            for (name, default) in &metadata.variables {
                println!("  var:      {name} = {default}");
            }
        },
        Details::Stack { files, directories, config } => {
            println!("  files:    {files} in {directories} directories");
            if let Some(config) = config {
                println!("  author:   {}", config.author);
                if !config.description.is_empty() {
                    println!("  desc:     {}", config.description);
                }
            }
        },
    }
}
