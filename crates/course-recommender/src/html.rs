//! Inline HTML template for the course selection page

use course_model::Recommendation;

/// Course selection form, plus the results list once a course was submitted.
///
/// `results` is `None` on a plain GET and `Some` (possibly empty) after a POST.
pub fn index_page(
    names: &[String],
    selected: Option<&str>,
    results: Option<&[Recommendation]>,
) -> String {
    let options: String = names
        .iter()
        .map(|name| {
            let marker = if selected == Some(name.as_str()) { " selected" } else { "" };
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                html_escape(name),
                marker
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    let results_section = match (selected, results) {
        (Some(course), Some(recs)) => results_list(course, recs),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Course Recommender</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
        <h1>Course Recommender</h1>
        <p>Pick a course to see similar ones.</p>

        <form method="post" action="/">
            <label for="course_name">Course</label>
            <select id="course_name" name="course_name" required>
                {}
            </select>
            <button type="submit">Recommend</button>
        </form>
{}
    </div>
</body>
</html>"#,
        CSS_STYLES, options, results_section
    )
}

fn results_list(course: &str, recs: &[Recommendation]) -> String {
    if recs.is_empty() {
        return format!(
            r#"
        <section class="results">
            <p class="empty">No recommendations for {}.</p>
        </section>"#,
            html_escape(course)
        );
    }

    let items: String = recs
        .iter()
        .map(|rec| {
            format!(
                r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
                html_escape(&rec.url),
                html_escape(&rec.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    format!(
        r#"
        <section class="results">
            <h2>Because you picked {}</h2>
            <ol>
                {}
            </ol>
        </section>"#,
        html_escape(course),
        items
    )
}

/// Escape text for use in element content and quoted attributes
fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const CSS_STYLES: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #f4f6fb;
    color: #222;
    margin: 0;
    padding: 40px 20px;
}
.container {
    background: #fff;
    margin: 0 auto;
    padding: 32px;
    border-radius: 10px;
    max-width: 560px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.08);
}
h1 {
    margin: 0 0 8px 0;
    font-size: 26px;
}
h2 {
    font-size: 18px;
    margin: 28px 0 12px 0;
}
label {
    display: block;
    margin: 16px 0 8px 0;
    font-size: 14px;
}
select {
    width: 100%;
    padding: 10px;
    border: 1px solid #ccd;
    border-radius: 6px;
    font-size: 15px;
}
button {
    margin-top: 16px;
    padding: 12px 20px;
    background: #2f5bea;
    color: #fff;
    border: none;
    border-radius: 6px;
    font-size: 15px;
    cursor: pointer;
}
ol li {
    margin-bottom: 8px;
}
a {
    color: #2f5bea;
}
.empty {
    color: #a33;
}
"#;
