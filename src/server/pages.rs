//! Server-rendered HTML for the setup flow.

/// Escape text for safe interpolation into HTML bodies and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 32rem; margin: 3rem auto; padding: 0 1rem; }}
label {{ display: block; margin-top: 1rem; }}
input {{ width: 100%; padding: .5rem; box-sizing: border-box; }}
button {{ margin-top: 1.5rem; padding: .6rem 1.2rem; }}
.error {{ color: #b00020; border: 1px solid #b00020; padding: .75rem; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Setup form, optionally showing the error from a failed submission.
#[must_use]
pub fn setup_form(uid: Option<&str>, error: Option<&str>) -> String {
    let uid = escape_html(uid.unwrap_or_default());
    let error_block = error.map_or_else(String::new, |msg| {
        format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(msg))
    });

    let body = format!(
        r#"<h1>Connect your task manager</h1>
<p>Paste your API token so action items from your conversations become tasks in your inbox.</p>
{error_block}
<form method="post" action="/setup">
<input type="hidden" name="uid" value="{uid}">
<label for="api_key">API token</label>
<input type="password" id="api_key" name="api_key" autocomplete="off" required>
<button type="submit">Save</button>
</form>"#
    );
    layout("Task integration setup", &body)
}

/// Confirmation page shown once the credential is validated and stored.
#[must_use]
pub fn setup_success() -> String {
    layout(
        "Setup complete",
        "<h1>You're all set</h1>\n<p>New action items will now be added to your task inbox. You can close this page.</p>",
    )
}
