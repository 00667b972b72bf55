/// Result formatting: human-readable text and JSON.
///
/// - **Human mode** (default): a unified-diff-inspired listing on stdout.
///   Markers are colour-coded (`-` red, `+` green, `~` yellow) when colours
///   are enabled. Colours are disabled when `--no-color` is set, the
///   `NO_COLOR` environment variable is present (per <https://no-color.org>),
///   or stdout is not a TTY.
/// - **JSON mode**: the core result types serialized as one pretty-printed
///   JSON document.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use csdiff_core::{
    CodeSystemDiff, CombinedVertex, ConceptDiff, DiffSession, DiffSummary, KeyedListDiffKind,
    KeyedListDiffResult, MetadataComparison, MetadataDetail, ScalarComparison, Side, Subgraph,
};
use serde::Serialize;

/// Returns `true` if ANSI colour codes should be emitted to stdout.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Formatter settings derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    pub colors: bool,
    /// Emit timing to stderr.
    pub verbose: bool,
}

impl FormatterConfig {
    pub fn from_flags(no_color_flag: bool, verbose: bool) -> Self {
        Self {
            colors: colors_enabled(no_color_flag),
            verbose,
        }
    }

    fn marker(&self, marker: Marker) -> String {
        let (text, color) = match marker {
            Marker::Removed => ("-", ANSI_RED),
            Marker::Added => ("+", ANSI_GREEN),
            Marker::Changed => ("~", ANSI_YELLOW),
        };
        if self.colors {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_owned()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Removed,
    Added,
    Changed,
}

/// Writes any serializable result as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

/// Writes timing information in verbose mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing_human<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.verbose {
        return Ok(());
    }
    writeln!(writer, "{label} in {}ms", duration.as_millis())
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

/// Writes the session's diff in human-readable form.
///
/// With `summary_only` just the closing summary line is written.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_diff_human<W: Write>(
    writer: &mut W,
    session: &DiffSession,
    summary_only: bool,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let diff = session.diff();
    if !summary_only {
        write_metadata_human(writer, diff, config)?;
        write_concepts_human(writer, session, config)?;
    }
    write_diff_summary(writer, &diff.summary())
}

fn write_metadata_human<W: Write>(
    writer: &mut W,
    diff: &CodeSystemDiff,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let changed: Vec<&MetadataComparison> =
        diff.metadata.iter().filter(|m| !m.is_identical()).collect();
    if changed.is_empty() {
        return Ok(());
    }
    writeln!(writer, "Metadata:")?;
    for item in changed {
        let hint = if item.expect_differences {
            " (expected)"
        } else {
            ""
        };
        match &item.detail {
            MetadataDetail::Scalar(scalar) => writeln!(
                writer,
                "  {} {}: {}{hint}",
                config.marker(Marker::Changed),
                item.item,
                scalar_change(scalar)
            )?,
            MetadataDetail::List(entries) => {
                writeln!(
                    writer,
                    "  {} {}{hint}",
                    config.marker(Marker::Changed),
                    item.item
                )?;
                for entry in entries {
                    write_keyed_entry(writer, "    ", entry, config)?;
                }
            }
        }
    }
    writeln!(writer)
}

fn write_concepts_human<W: Write>(
    writer: &mut W,
    session: &DiffSession,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let diff = session.diff();
    let changed: Vec<&ConceptDiff> = diff.changed_concepts().collect();
    if diff.only_in_left.is_empty() && diff.only_in_right.is_empty() && changed.is_empty() {
        return Ok(());
    }
    writeln!(writer, "Concepts:")?;
    for code in &diff.only_in_left {
        write_one_sided(writer, session, Side::Left, code, config)?;
    }
    for code in &diff.only_in_right {
        write_one_sided(writer, session, Side::Right, code, config)?;
    }
    for concept in changed {
        writeln!(writer, "  {} {}", config.marker(Marker::Changed), concept.code)?;
        if !concept.display.is_identical() {
            writeln!(writer, "      display: {}", scalar_change(&concept.display))?;
        }
        if !concept.definition.is_identical() {
            writeln!(
                writer,
                "      definition: {}",
                scalar_change(&concept.definition)
            )?;
        }
        for property in concept.properties.iter().filter(|p| !p.is_identical()) {
            write_keyed_entry(writer, "      property ", property, config)?;
        }
        for designation in concept.designations.iter().filter(|d| !d.is_identical()) {
            write_keyed_entry(writer, "      designation ", designation, config)?;
        }
    }
    writeln!(writer)
}

fn write_one_sided<W: Write>(
    writer: &mut W,
    session: &DiffSession,
    side: Side,
    code: &str,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let marker = match side {
        Side::Left => Marker::Removed,
        Side::Right => Marker::Added,
    };
    let display = session
        .graph(side)
        .concept(code)
        .and_then(|c| c.display.as_deref());
    match display {
        Some(display) => writeln!(writer, "  {} {code} \"{display}\"", config.marker(marker)),
        None => writeln!(writer, "  {} {code}", config.marker(marker)),
    }
}

fn write_keyed_entry<W: Write, K: std::fmt::Display>(
    writer: &mut W,
    prefix: &str,
    entry: &KeyedListDiffResult<K, String>,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let left = entry.left.as_deref().map(|v| v.join(", ")).unwrap_or_default();
    let right = entry.right.as_deref().map(|v| v.join(", ")).unwrap_or_default();
    match entry.kind {
        KeyedListDiffKind::KeyOnlyInLeft => writeln!(
            writer,
            "{prefix}{} {}: {left}",
            config.marker(Marker::Removed),
            entry.key
        ),
        KeyedListDiffKind::KeyOnlyInRight => writeln!(
            writer,
            "{prefix}{} {}: {right}",
            config.marker(Marker::Added),
            entry.key
        ),
        KeyedListDiffKind::ValueDifferent => writeln!(
            writer,
            "{prefix}{} {}: {left} -> {right}",
            config.marker(Marker::Changed),
            entry.key
        ),
        KeyedListDiffKind::Identical => Ok(()),
    }
}

fn scalar_change(scalar: &ScalarComparison) -> String {
    let show = |v: &Option<String>| match v {
        Some(s) => format!("\"{s}\""),
        None => "(absent)".to_owned(),
    };
    format!("{} -> {}", show(&scalar.left), show(&scalar.right))
}

fn write_diff_summary<W: Write>(writer: &mut W, summary: &DiffSummary) -> std::io::Result<()> {
    writeln!(
        writer,
        "metadata: {} different ({} unexpected); concepts: {} only in left, {} only in right, {} changed, {} unchanged",
        summary.metadata_different,
        summary.metadata_unexpected,
        summary.only_in_left,
        summary.only_in_right,
        summary.concepts_different,
        summary.concepts_identical,
    )
}

// ---------------------------------------------------------------------------
// neighborhood
// ---------------------------------------------------------------------------

/// Writes an extracted neighborhood in human-readable form.
///
/// Vertices are listed by depth, then code. Relationships claimed by only one
/// document carry the `~` marker.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_neighborhood_human<W: Write>(
    writer: &mut W,
    subgraph: &Subgraph,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "Neighborhood of '{}' (radius {}): {} {}, {} {}",
        subgraph.focus,
        subgraph.radius,
        subgraph.vertices.len(),
        pluralize(subgraph.vertices.len(), "concept", "concepts"),
        subgraph.edges.len(),
        pluralize(subgraph.edges.len(), "relationship", "relationships"),
    )?;

    let mut vertices: Vec<(u32, &CombinedVertex)> = subgraph
        .vertices
        .iter()
        .map(|v| (subgraph.depth(&v.code).unwrap_or(0), v))
        .collect();
    vertices.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.code.cmp(&b.1.code)));

    writeln!(writer, "Concepts:")?;
    for (depth, vertex) in vertices {
        writeln!(
            writer,
            "  {depth}  {} [{}] {}",
            vertex.code,
            vertex.side.as_str(),
            vertex.label().unwrap_or_default()
        )?;
    }

    if subgraph.edges.is_empty() {
        return Ok(());
    }
    writeln!(writer, "Relationships:")?;
    for edge in &subgraph.edges {
        if edge.is_shared() {
            writeln!(writer, "    {edge}")?;
        } else {
            writeln!(writer, "  {} {edge}", config.marker(Marker::Changed))?;
        }
    }
    Ok(())
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}
