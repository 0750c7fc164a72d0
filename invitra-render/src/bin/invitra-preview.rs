use invitra_render::{
    html, DesignCustomizationModel, EventDescriptor, RenderError, ThemeSelection,
};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: invitra-preview <file.yaml|file.json> [--style KEY] [--scheme KEY] [--out FILE]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  invitra-preview event.yaml");
        eprintln!("  invitra-preview event.json --style elegant --scheme warm_autumn --out preview.html");
        process::exit(1);
    }

    let mut input: Option<String> = None;
    let mut style: Option<String> = None;
    let mut scheme: Option<String> = None;
    let mut out: Option<String> = None;

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--style" => style = iter.next().cloned(),
            "--scheme" => scheme = iter.next().cloned(),
            "--out" => out = iter.next().cloned(),
            _ => input = Some(arg.clone()),
        }
    }

    let Some(input) = input else {
        eprintln!("✗ no input file given");
        process::exit(1);
    };

    match run(&input, style, scheme, out.as_deref()) {
        Ok(Some(path)) => {
            println!("✓ {} rendered to {}", input, path);
        }
        Ok(None) => {
            println!("✓ {} is valid", input);
        }
        Err(e) => {
            eprintln!("✗ {} has errors:", input);
            print_error(&e);
            process::exit(1);
        }
    }
}

/// Reads the descriptor, validates it, renders it, and optionally writes the
/// document. Returns the output path when one was written.
fn run(
    input: &str,
    style: Option<String>,
    scheme: Option<String>,
    out: Option<&str>,
) -> Result<Option<String>, RenderError> {
    let content =
        fs::read_to_string(input).map_err(|e| RenderError::Io(format!("failed to read file: {}", e)))?;

    let event: EventDescriptor = if input.ends_with(".json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    let mut theme = ThemeSelection::default();
    if let Some(style) = style {
        theme.style = style;
    }
    if let Some(scheme) = scheme {
        theme.color_scheme = scheme;
    }
    let design = DesignCustomizationModel::seeded_from(&theme);

    let document = html::render(&event, &theme, &design)?;

    if let Some(path) = out {
        fs::write(path, document)
            .map_err(|e| RenderError::Io(format!("failed to write output: {}", e)))?;
        return Ok(Some(path.to_string()));
    }
    Ok(None)
}

fn print_error(error: &RenderError) {
    match error {
        RenderError::EmptyTitle => {
            eprintln!("  Event title must not be empty");
        }
        RenderError::RsvpOptionsBelowMinimum { provided, minimum } => {
            eprintln!("  RSVP needs at least {} options, found {}", minimum, provided);
        }
        RenderError::ProtectedRsvpOption { index } => {
            eprintln!("  RSVP option {} is a protected default", index);
        }
        RenderError::EmptyRsvpOption { index } => {
            eprintln!("  RSVP option {} must not be empty", index);
        }
        RenderError::InvalidColor { value, reason } => {
            eprintln!("  Invalid color value '{}':", value);
            eprintln!("    {}", reason);
        }
        RenderError::ValueOutOfRange {
            field,
            value,
            range,
        } => {
            eprintln!("  Value out of range for '{}':", field);
            eprintln!("    Value: {}", value);
            eprintln!("    Expected range: {}", range);
        }
        RenderError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        RenderError::JsonError(msg) => {
            eprintln!("  JSON error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
