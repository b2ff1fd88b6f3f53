//! HTML rendering for the single upload page.

use flashcards_core::Flashcard;
use html_escape::encode_text;

/// Everything the page shows for one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub flashcards: Vec<Flashcard>,
    pub error: Option<String>,
}

impl PageView {
    pub fn with_flashcards(flashcards: Vec<Flashcard>) -> Self {
        Self {
            flashcards,
            error: None,
        }
    }

    /// An error page never carries flashcards.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self {
            flashcards: Vec::new(),
            error: Some(error.into()),
        }
    }
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PDF Flashcards</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  .error { color: #b00020; border: 1px solid #b00020; padding: .75rem; border-radius: 4px; white-space: pre-wrap; }
  .card { border: 1px solid #ccc; border-radius: 6px; padding: .75rem 1rem; margin: .75rem 0; }
  .question { font-weight: 600; }
  .answer { margin-top: .4rem; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>PDF Flashcards</h1>
<form method="post" action="/" enctype="multipart/form-data">
  <input type="file" name="pdf" accept=".pdf,application/pdf" required>
  <button type="submit">Generate flashcards</button>
</form>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Render the full page: upload form, then the error or the flashcard list.
pub fn render_page(view: &PageView) -> String {
    let mut html = String::from(HEAD);

    if let Some(error) = &view.error {
        html.push_str(&format!(
            "<p class=\"error\" role=\"alert\">{}</p>\n",
            encode_text(error)
        ));
    }

    if !view.flashcards.is_empty() {
        html.push_str(&format!(
            "<h2>{} flashcard{}</h2>\n<ol class=\"flashcards\">\n",
            view.flashcards.len(),
            if view.flashcards.len() == 1 { "" } else { "s" }
        ));
        for card in &view.flashcards {
            html.push_str(&format!(
                "<li class=\"card\"><div class=\"question\">Q: {}</div><div class=\"answer\">A: {}</div></li>\n",
                encode_text(&card.question),
                encode_text(&card.answer)
            ));
        }
        html.push_str("</ol>\n");
    }

    html.push_str(TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_has_form_only() {
        let html = render_page(&PageView::default());
        assert!(html.contains(r#"name="pdf""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(!html.contains("class=\"error\""));
        assert!(!html.contains("<ol"));
    }

    #[test]
    fn error_is_shown() {
        let html = render_page(&PageView::with_error("PDF has no readable text."));
        assert!(html.contains("PDF has no readable text."));
        assert!(!html.contains("<ol"));
    }

    #[test]
    fn cards_are_listed_in_order() {
        let html = render_page(&PageView::with_flashcards(vec![
            Flashcard::new("First?", "1"),
            Flashcard::new("Second?", "2"),
        ]));
        assert!(html.contains("2 flashcards"));
        let first = html.find("Q: First?").unwrap();
        let second = html.find("Q: Second?").unwrap();
        assert!(first < second);
        assert!(html.contains("A: 1"));
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let html = render_page(&PageView::with_flashcards(vec![Flashcard::new(
            "Is 1 < 2 && 3 > 2?",
            "<script>alert(1)</script>",
        )]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("1 &lt; 2 &amp;&amp; 3 &gt; 2"));

        let html = render_page(&PageView::with_error("[Error 400]: <html>bad</html>"));
        assert!(html.contains("[Error 400]: &lt;html&gt;bad&lt;/html&gt;"));
    }
}
