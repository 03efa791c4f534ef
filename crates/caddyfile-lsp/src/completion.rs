//! Mapping completion contexts to LSP completion items.

use caddyfile_analysis::{CompletionContext, collect_snippet_names, resolve_completion_context};
use caddyfile_parse::{Position, parse};
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};
use tracing::debug;

/// Completion items for the cursor at `line`/`character` in `content`.
pub fn completions_at(content: &str, line: u32, character: u32) -> Vec<CompletionItem> {
    let (file, _errors) = parse(content);
    let context = resolve_completion_context(&file, content, Position::new(line, character));
    debug!(?context, line, character, "resolved completion context");

    match context {
        CompletionContext::TopLevelNames(names) => names
            .iter()
            .map(|name| CompletionItem {
                label: (*name).to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                ..Default::default()
            })
            .collect(),
        CompletionContext::SubdirectiveNames { parent, names } => names
            .iter()
            .map(|name| CompletionItem {
                label: (*name).to_string(),
                kind: Some(CompletionItemKind::PROPERTY),
                detail: Some(format!("{parent} subdirective")),
                ..Default::default()
            })
            .collect(),
        CompletionContext::SnippetNamePrefix(prefix) => collect_snippet_names(&file)
            .into_iter()
            .filter(|name| name.starts_with(prefix.as_str()))
            .map(|name| CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::MODULE),
                detail: Some("snippet".to_string()),
                ..Default::default()
            })
            .collect(),
        CompletionContext::NotCompletable | CompletionContext::FreeformNoCompletion => Vec::new(),
    }
}
