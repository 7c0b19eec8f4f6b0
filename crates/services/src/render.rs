//! Rendering collaborator for question and option bodies.
//!
//! Question text may carry markdown-ish markup (including inline math kept
//! verbatim); the engine treats rendering as an opaque service keyed by a
//! stable context key so repeated renders of the same content are idempotent
//! and cache-friendly.

use std::collections::{HashMap, HashSet};

/// Where the rendered block will sit; lets a renderer pick sizing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RenderStyle {
    QuestionBody,
    OptionLabel,
}

impl RenderStyle {
    fn line_height(self) -> u32 {
        match self {
            RenderStyle::QuestionBody => 24,
            RenderStyle::OptionLabel => 20,
        }
    }
}

/// Output of a render call: sanitized HTML plus a measured height estimate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedBlock {
    pub html: String,
    pub height: u32,
}

/// Opaque rendering service for question/option content.
pub trait ContentRenderer {
    /// Render `text` under a stable `context_key` (one per question/option).
    /// Rendering the same key again must return the same block.
    fn render(&mut self, text: &str, context_key: &str, style: RenderStyle) -> RenderedBlock;
}

/// Markdown renderer with a per-context-key cache.
#[derive(Default)]
pub struct MarkdownRenderer {
    cache: HashMap<String, RenderedBlock>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cached_blocks(&self) -> usize {
        self.cache.len()
    }

    fn render_uncached(text: &str, style: RenderStyle) -> RenderedBlock {
        let mut options = pulldown_cmark::Options::empty();
        options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
        options.insert(pulldown_cmark::Options::ENABLE_TABLES);

        let parser = pulldown_cmark::Parser::new_ext(text, options);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, parser);
        let html = sanitize_html(&html);

        let lines = html.matches('\n').count().max(1) as u32;
        RenderedBlock {
            html,
            height: lines * style.line_height(),
        }
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&mut self, text: &str, context_key: &str, style: RenderStyle) -> RenderedBlock {
        if let Some(block) = self.cache.get(context_key) {
            return block.clone();
        }
        let block = Self::render_uncached(text, style);
        self.cache.insert(context_key.to_owned(), block.clone());
        block
    }
}

#[must_use]
fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "code", "pre", "blockquote", "ul",
        "ol", "li", "sub", "sup",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new().tags(tags).clean(html).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_renders_of_same_key_are_idempotent() {
        let mut renderer = MarkdownRenderer::new();
        let first = renderer.render("E = mc^2", "q1.body", RenderStyle::QuestionBody);
        let second = renderer.render("E = mc^2", "q1.body", RenderStyle::QuestionBody);

        assert_eq!(first, second);
        assert_eq!(renderer.cached_blocks(), 1);
    }

    #[test]
    fn distinct_keys_render_separately() {
        let mut renderer = MarkdownRenderer::new();
        renderer.render("one", "q1.body", RenderStyle::QuestionBody);
        renderer.render("two", "q1.opt.A", RenderStyle::OptionLabel);
        assert_eq!(renderer.cached_blocks(), 2);
    }

    #[test]
    fn script_markup_is_stripped() {
        let mut renderer = MarkdownRenderer::new();
        // The raw HTML block must sit in its own paragraph or the markdown
        // that follows stays literal text inside the block.
        let block = renderer.render(
            "<script>alert(1)</script>\n\n**bold**",
            "q9.body",
            RenderStyle::QuestionBody,
        );
        assert!(!block.html.contains("script"));
        assert!(block.html.contains("<strong>"));
    }

    #[test]
    fn height_scales_with_style() {
        let body = MarkdownRenderer::render_uncached("line", RenderStyle::QuestionBody);
        let label = MarkdownRenderer::render_uncached("line", RenderStyle::OptionLabel);
        assert!(body.height > label.height);
    }
}
