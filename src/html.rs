use crate::types::api::PasteData;

/// Escape the five HTML-special characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a paste as a standalone HTML document.
pub fn paste_page(id: &str, data: &PasteData) -> String {
    let mut notes = Vec::new();
    if let Some(remaining) = data.remaining_views {
        notes.push(format!("{remaining} views remaining"));
    }
    if let Some(expires_at) = data.expires_at {
        notes.push(format!("expires {}", expires_at.to_rfc3339()));
    }

    let meta = if notes.is_empty() {
        String::new()
    } else {
        format!("<p class=\"meta\">{}</p>\n", escape(&notes.join(", ")))
    };

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         {meta}\
         <pre>{content}</pre>\n\
         </body>\n\
         </html>\n",
        title = escape(id),
        content = escape(&data.content),
    )
}
