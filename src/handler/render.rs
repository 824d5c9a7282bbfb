//! Page and fragment rendering
//!
//! The page is small enough to build with `format!`; every value that
//! came from the request goes through [`escape_html`].

use std::fmt::Write;

use crate::features::{Feature, FeatureKind, BINARY_TRUE_VALUES, FEATURES};
use crate::http::FormData;

/// Prediction slot on its own, returned to `fetch` callers
pub fn render_fragment(prediction: Option<&str>) -> String {
    match prediction {
        Some(text) => {
            let class = if text.starts_with(super::predict::ERROR_PREFIX) {
                "prediction error"
            } else {
                "prediction"
            };
            format!(
                "<div class=\"{class}\" role=\"status\"><strong>Prediction:</strong> {}</div>",
                escape_html(text)
            )
        }
        None => String::new(),
    }
}

/// Full page: the form, pre-filled with the last submission, plus the
/// prediction slot
pub fn render_page(submitted: Option<&FormData>, prediction: Option<&str>) -> String {
    let mut fields = String::new();
    for feature in &FEATURES {
        let value = submitted.and_then(|f| f.get(feature.name));
        render_field(&mut fields, feature, value);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Heart Failure Survival Prediction</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif; background: #f4f6fb; color: #1f2933; }}
        main {{ max-width: 640px; margin: 40px auto; padding: 32px; background: #fff; border-radius: 12px; box-shadow: 0 4px 20px rgba(0, 0, 0, 0.08); }}
        h1 {{ font-size: 1.6em; margin-bottom: 24px; }}
        .field {{ display: grid; grid-template-columns: 1fr 1fr; gap: 8px; align-items: center; margin-bottom: 12px; }}
        .field small {{ grid-column: 2; color: #6b7280; }}
        input, select {{ padding: 6px 8px; border: 1px solid #cbd2d9; border-radius: 6px; }}
        button {{ margin-top: 16px; padding: 10px 20px; border: 0; border-radius: 6px; background: #c53030; color: #fff; cursor: pointer; }}
        .prediction {{ margin-top: 24px; padding: 12px 16px; border-radius: 8px; background: #e6fffa; }}
        .prediction.error {{ background: #fff5f5; color: #9b2c2c; }}
    </style>
</head>
<body>
<main>
    <h1>Heart Failure Survival Prediction</h1>
    <form id="predict-form" method="post" action="/">
{fields}        <button type="submit">Predict</button>
    </form>
    <div id="prediction">{prediction}</div>
</main>
<script>
    document.getElementById("predict-form").addEventListener("submit", async (event) => {{
        event.preventDefault();
        const body = new URLSearchParams(new FormData(event.target));
        const resp = await fetch("/", {{
            method: "POST",
            headers: {{ "X-Requested-With": "XMLHttpRequest" }},
            body,
        }});
        document.getElementById("prediction").innerHTML = await resp.text();
    }});
</script>
</body>
</html>
"#,
        prediction = render_fragment(prediction),
    )
}

fn render_field(out: &mut String, feature: &Feature, value: Option<&str>) {
    let name = feature.name;
    let label = escape_html(&feature.label());
    let _ = writeln!(out, "        <div class=\"field\">");
    let _ = writeln!(out, "            <label for=\"{name}\">{label}</label>");
    match feature.kind {
        FeatureKind::Binary => {
            let (yes, no) = if name == "sex" {
                ("Male", "Female")
            } else {
                ("Yes", "No")
            };
            // echo what the value coerced to, not its spelling
            let chosen = value.map(|raw| if BINARY_TRUE_VALUES.contains(&raw) { yes } else { no });
            let _ = writeln!(out, "            <select id=\"{name}\" name=\"{name}\">");
            for option in [no, yes] {
                let selected = if chosen == Some(option) { " selected" } else { "" };
                let _ = writeln!(
                    out,
                    "                <option value=\"{option}\"{selected}>{option}</option>"
                );
            }
            let _ = writeln!(out, "            </select>");
        }
        FeatureKind::Continuous => {
            let (min, max) = feature.range.map_or((f64::MIN, f64::MAX), |r| (r.min, r.max));
            let _ = writeln!(
                out,
                "            <input type=\"number\" step=\"any\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{}\" required>",
                escape_html(value.unwrap_or_default())
            );
        }
    }
    let _ = writeln!(out, "            <small>{}</small>", escape_html(feature.hint));
    let _ = writeln!(out, "        </div>");
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
