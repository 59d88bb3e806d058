//! Markdown → HTML for the report email.
//!
//! Only the handful of line prefixes the report generator emits are
//! recognised; everything else becomes a paragraph. Text is HTML-escaped.

use pulldown_cmark::escape::escape_html;

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
.container { background-color: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
h1 { color: #1a1a1a; font-size: 28px; margin-bottom: 10px; border-bottom: 3px solid #dc2626; padding-bottom: 10px; }
h2 { color: #dc2626; font-size: 22px; margin-top: 30px; margin-bottom: 15px; border-left: 4px solid #dc2626; padding-left: 12px; }
h3 { color: #374151; font-size: 18px; margin-top: 20px; margin-bottom: 10px; }
p { margin: 10px 0; color: #4b5563; }
ul { margin: 10px 0; padding-left: 25px; }
li { margin: 8px 0; color: #4b5563; }
.timestamp { color: #6b7280; font-style: italic; font-size: 14px; margin-bottom: 20px; }
.footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e7eb; color: #6b7280; font-size: 12px; text-align: center; }";

const FOOTER: &[&str] = &[
    "<div class='footer'>",
    "<p>Crime Intelligence Report | Automated by Informa</p>",
    "<p>This is an automated email. Please do not reply.</p>",
    "</div>",
];

#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Heading(u8, &'a str),
    Timestamp(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

fn classify(line: &str) -> Option<Block<'_>> {
    if line.is_empty() {
        return None;
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Some(Block::Heading(1, rest));
    }
    if line.len() > 1 && line.starts_with('*') && line.ends_with('*') && !line.starts_with("**")
    {
        return Some(Block::Timestamp(&line[1..line.len() - 1]));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Some(Block::Heading(2, rest));
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return Some(Block::Heading(3, rest));
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Some(Block::ListItem(rest));
    }
    if let Some(rest) = line.strip_prefix("* ") {
        return Some(Block::ListItem(rest));
    }
    Some(Block::Paragraph(line))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html(&mut out, text);
    out
}

/// Converts report markdown into a styled, self-contained HTML email body.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html: Vec<String> = vec![
        "<!DOCTYPE html>".into(),
        "<html>".into(),
        "<head>".into(),
        "<meta charset='utf-8'>".into(),
        "<meta name='viewport' content='width=device-width, initial-scale=1.0'>".into(),
        "<style>".into(),
        STYLE.into(),
        "</style>".into(),
        "</head>".into(),
        "<body>".into(),
        "<div class='container'>".into(),
    ];

    let mut in_list = false;
    for block in markdown.lines().filter_map(|l| classify(l.trim())) {
        let is_item = matches!(block, Block::ListItem(_));
        if is_item && !in_list {
            html.push("<ul>".into());
            in_list = true;
        } else if !is_item && in_list {
            html.push("</ul>".into());
            in_list = false;
        }

        html.push(match block {
            Block::Heading(level, text) => format!("<h{level}>{}</h{level}>", escape(text)),
            Block::Timestamp(text) => format!("<p class='timestamp'>{}</p>", escape(text)),
            Block::ListItem(text) => format!("<li>{}</li>", escape(text)),
            Block::Paragraph(text) => format!("<p>{}</p>", escape(text)),
        });
    }
    if in_list {
        html.push("</ul>".into());
    }

    html.extend(FOOTER.iter().map(|s| s.to_string()));
    html.extend(["</div>".into(), "</body>".into(), "</html>".into()]);
    html.join("\n")
}
