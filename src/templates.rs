use anyhow::{Context, Result};
use minijinja::{context, Environment};

// Templates are compiled into the binary so the app runs from any working
// directory. Registration failures are programmer errors caught by the
// template tests.
lazy_static::lazy_static! {
    static ref TEMPLATES: Environment<'static> = {
        let mut env = Environment::new();
        env.add_template("form_page.html", include_str!("../templates/form_page.html"))
            .expect("form_page.html template is valid");
        env.add_template("submit_result.html", include_str!("../templates/submit_result.html"))
            .expect("submit_result.html template is valid");
        env
    };
}

/// Wrap a generated form fragment in the full page skeleton (Tailwind CDN,
/// heading, client-side download button). The fragment is inserted unescaped;
/// it is markup by contract.
pub fn render_form_page(heading: &str, form_html: &str, file_name: &str) -> Result<String> {
    let template = TEMPLATES
        .get_template("form_page.html")
        .context("form page template missing")?;
    template
        .render(context! { heading, form_html, file_name })
        .context("Failed to render form page")
}

/// Confirmation page echoing the submitted fields back as indented JSON.
pub fn render_submission_receipt(data_json: &str) -> Result<String> {
    let template = TEMPLATES
        .get_template("submit_result.html")
        .context("submission receipt template missing")?;
    template
        .render(context! { data_json })
        .context("Failed to render submission receipt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_page_embeds_fragment_unescaped() {
        let page = render_form_page(
            "Generated Form",
            "<form><input name=\"a\"></form>",
            "form_12345678.html",
        )
        .unwrap();

        assert!(page.contains("<form><input name=\"a\"></form>"));
        assert!(page.contains("Generated Form 📝"));
        assert!(page.contains("a.download = 'form_12345678.html';"));
        assert!(page.contains("cdn.tailwindcss.com"));
    }

    #[test]
    fn test_form_page_escapes_heading() {
        let page = render_form_page("<b>x</b>", "<form></form>", "f.html").unwrap();
        assert!(page.contains("&lt;b&gt;x&lt;&#x2f;b&gt;") || page.contains("&lt;b&gt;"));
        assert!(!page.contains("<title><b>"));
    }

    #[test]
    fn test_submission_receipt_shows_data() {
        let receipt = render_submission_receipt("{\n  \"name\": \"Ada\"\n}").unwrap();
        assert!(receipt.contains("Form Submitted Successfully!"));
        assert!(receipt.contains("Data Received:"));
        // The JSON lands inside a <pre>, HTML-escaped.
        assert!(receipt.contains("name"));
        assert!(receipt.contains("Ada"));
    }
}
