use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{HttpLookup, LookupConfig};
use table_layout::{
    load_layout_config, HtmlDocument, LayoutConfig, LayoutDispatcher, Selection, Trigger,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transpose tables inside an HTML document.
    Transpose {
        input: PathBuf,
        /// Write here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Layout config (defaults to ./layout.toml when present).
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        mode: ModeArgs,
    },
    /// Query an option lookup endpoint and print `value<TAB>label` lines.
    Lookup {
        #[arg(long, default_value = "http://127.0.0.1:8443/_get_microscopes/")]
        endpoint: String,
        #[arg(long, default_value = "center")]
        param: String,
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
        value: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ModeArgs {
    /// Only the table with this id.
    #[arg(long)]
    table_id: Option<String>,
    /// Every table whose id starts with this prefix.
    #[arg(long)]
    prefix: Option<String>,
    /// Every table in the document.
    #[arg(long)]
    all: bool,
    /// Whatever the layout config binds to page-ready.
    #[arg(long)]
    ready: bool,
    /// Whatever the layout config binds to clicking this control.
    #[arg(long)]
    click: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Scoped(String),
    Prefix(String),
    All,
    Trigger(Trigger),
}

impl From<ModeArgs> for Mode {
    fn from(args: ModeArgs) -> Self {
        if let Some(id) = args.table_id {
            Mode::Scoped(id)
        } else if let Some(prefix) = args.prefix {
            Mode::Prefix(prefix)
        } else if let Some(control) = args.click {
            Mode::Trigger(Trigger::click(control))
        } else if args.ready {
            Mode::Trigger(Trigger::Ready)
        } else {
            Mode::All
        }
    }
}

fn transpose_document(
    html: &str,
    mode: &Mode,
    config: &LayoutConfig,
) -> Result<(String, usize)> {
    let mut doc = HtmlDocument::parse(html)?;
    let touched = match mode {
        Mode::Scoped(id) => doc.page_mut().apply(&[Selection::ById(id.as_str().into())]),
        Mode::Prefix(prefix) => doc
            .page_mut()
            .apply(&[Selection::IdPrefix(prefix.clone())]),
        Mode::All => doc.page_mut().apply(&[Selection::All]),
        Mode::Trigger(trigger) => {
            LayoutDispatcher::from_config(config).dispatch(doc.page_mut(), trigger)
        }
    };
    Ok((doc.render(), touched.len()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Transpose {
            input,
            output,
            config,
            mode,
        } => {
            let html = fs::read_to_string(&input)
                .with_context(|| format!("failed to read '{}'", input.display()))?;
            let config = load_layout_config(config.as_deref());
            let (rendered, touched) = transpose_document(&html, &Mode::from(mode), &config)
                .with_context(|| format!("failed to transpose tables in '{}'", input.display()))?;
            info!(tables = touched, input = %input.display(), "transposed tables");

            match output {
                Some(path) => fs::write(&path, rendered)
                    .with_context(|| format!("failed to write '{}'", path.display()))?,
                None => print!("{rendered}"),
            }
        }
        Command::Lookup {
            endpoint,
            param,
            timeout_secs,
            value,
        } => {
            let lookup = HttpLookup::from_config(&LookupConfig {
                endpoint,
                param,
                timeout_secs,
            })?;
            for option in lookup.fetch(&value).await? {
                println!("{}\t{}", option.value, option.label);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        "<table id=\"vertical_a\"><tr><th>k</th><th>v</th></tr><tr><td>1</td><td>2</td></tr></table>",
        "<table id=\"plain\"><tr><td>x</td><td>y</td></tr></table>"
    );

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["tools", "transpose", "in.html"]).is_err());
        assert!(Cli::try_parse_from(["tools", "transpose", "in.html", "--all", "--ready"]).is_err());

        let cli = Cli::try_parse_from(["tools", "transpose", "in.html", "--table-id", "plain"])
            .expect("parse");
        let Command::Transpose { mode, .. } = cli.command else {
            panic!("expected transpose");
        };
        assert_eq!(Mode::from(mode), Mode::Scoped("plain".into()));
    }

    #[test]
    fn scoped_mode_rewrites_one_table() {
        let (out, touched) =
            transpose_document(DOC, &Mode::Scoped("plain".into()), &LayoutConfig::default())
                .expect("transpose");
        assert_eq!(touched, 1);
        assert!(out.starts_with("<table id=\"vertical_a\"><tr><th>k</th>"));
        assert!(out.ends_with("<table id=\"plain\">\n<tr><th>x</th></tr>\n<tr><th>y</th></tr>\n</table>"));
    }

    #[test]
    fn ready_mode_follows_layout_config() {
        let (out, touched) = transpose_document(
            DOC,
            &Mode::Trigger(Trigger::Ready),
            &LayoutConfig::default(),
        )
        .expect("transpose");
        assert_eq!(touched, 1);
        assert!(out.starts_with(
            "<table id=\"vertical_a\">\n<tr><th>k</th><td>1</td></tr>\n<tr><th>v</th><td>2</td></tr>\n</table>"
        ));
    }

    #[test]
    fn all_mode_counts_every_table() {
        let (_, touched) =
            transpose_document(DOC, &Mode::All, &LayoutConfig::default()).expect("transpose");
        assert_eq!(touched, 2);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(transpose_document("<table><tr>", &Mode::All, &LayoutConfig::default()).is_err());
    }
}
