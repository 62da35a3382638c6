use std::fs;

use anyhow::{Context, bail};
use log::debug;
use serde::Serialize;
use spanmark::{Document, HighlightController, OptionsUpdate, Search, shared};

use crate::{FindArgs, config};

#[derive(Serialize)]
struct MatchOutput<'a> {
    node: u32,
    start: usize,
    end: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct FindOutput<'a> {
    highlight_name: &'a str,
    match_count: usize,
    matches: Vec<MatchOutput<'a>>,
}

pub fn run(args: FindArgs) -> anyhow::Result<()> {
    let mut options = config::load(&args.config)?.options;
    options.apply(OptionsUpdate {
        search: (!args.search.is_empty()).then(|| Search::Many(args.search.clone())),
        highlight_name: args.name.clone(),
        case_sensitive: args.case_sensitive.then_some(true),
        whole_word: args.whole_word.then_some(true),
        max_highlights: args.max,
        ..OptionsUpdate::default()
    });
    options.ignored_tags.extend(args.ignore.iter().cloned());

    if options.search.is_blank() {
        bail!("No search terms given. Pass --search or set `search` in the config file");
    }

    let source = fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read {}", args.document.display()))?;
    let (document, root) = Document::from_json(&source)
        .with_context(|| format!("Failed to parse {}", args.document.display()))?;
    debug!("Loaded {} nodes from {}", document.len(), args.document.display());
    let document = shared(document);

    let highlight_name = options.highlight_name.clone();
    let controller = HighlightController::new(document.clone(), Some(root), options);
    controller.refresh();
    if let Some(error) = controller.error() {
        bail!("Highlighting failed: {}", error);
    }

    let spans = spanmark::highlight_spans(&highlight_name);
    let document = document.read();
    let matches: Vec<_> = spans
        .iter()
        .map(|span| MatchOutput {
            node: span.node.0,
            start: span.start,
            end: span.end,
            text: span.text(&document).unwrap_or_default(),
        })
        .collect();

    if args.json {
        let output = FindOutput {
            highlight_name: &highlight_name,
            match_count: controller.match_count(),
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for m in &matches {
        println!("node {:<6} {:>6}..{:<6} {:?}", m.node, m.start, m.end, m.text);
    }
    let noun = if matches.len() == 1 { "match" } else { "matches" };
    println!();
    println!("{} {} under '{}'", matches.len(), noun, highlight_name);
    Ok(())
}
