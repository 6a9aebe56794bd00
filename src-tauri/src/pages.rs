// inline pages served from the quickai scheme

pub fn blank() -> String {
    "<!doctype html><html><head><meta charset=\"utf-8\"></head><body style=\"background:#1e1e1e\"></body></html>"
        .to_string()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Shown in place of a service that could not be loaded. The retry link
/// navigates straight back to the target.
pub fn navigation_failed(url: &str, reason: &str) -> String {
    let url = escape(url);
    let reason = escape(reason);
    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Could not load page</title>
<style>
  body {{ margin: 0; height: 100vh; display: flex; align-items: center; justify-content: center; background: #1e1e1e; color: #ddd; font-family: -apple-system, "Segoe UI", sans-serif; }}
  main {{ max-width: 460px; text-align: center; }}
  code {{ color: #aaa; word-break: break-all; }}
  a.retry {{ display: inline-block; margin-top: 16px; padding: 8px 18px; border-radius: 6px; background: #5a8dee; color: #fff; text-decoration: none; }}
</style>
</head>
<body>
<main>
  <h2>Could not load page</h2>
  <p><code>{url}</code></p>
  <p>{reason}</p>
  <a class="retry" href="{url}">Retry</a>
</main>
</body>
</html>
"#
    )
}
