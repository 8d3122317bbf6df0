//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one URL per line.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single item. Table output uses `detail_fn`, since detail
/// views are composed of several tables.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Entry {
        url: &'static str,
        nickname: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Nickname")]
        nickname: &'static str,
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry {
                url: "/forum/api/users/Mystery/",
                nickname: "Mystery",
            },
            Entry {
                url: "/forum/api/users/AxelW/",
                nickname: "AxelW",
            },
        ]
    }

    #[test]
    fn plain_emits_one_url_per_line() {
        let out = render_list(
            &OutputFormat::Plain,
            &entries(),
            |e| Row { nickname: e.nickname },
            |e| e.url.to_owned(),
        )
        .unwrap();
        assert_eq!(out, "/forum/api/users/Mystery/\n/forum/api/users/AxelW/");
    }

    #[test]
    fn table_has_renamed_header() {
        let out = render_list(
            &OutputFormat::Table,
            &entries(),
            |e| Row { nickname: e.nickname },
            |e| e.url.to_owned(),
        )
        .unwrap();
        assert!(out.contains("Nickname"));
        assert!(out.contains("AxelW"));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &entries(),
            |e| Row { nickname: e.nickname },
            |e| e.url.to_owned(),
        )
        .unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with("[{\"url\""));
    }
}
