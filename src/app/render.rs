//! HTML shells for tenant pages. The sections travel as a JSON data island; the
//! presentational components read their own sub-object from it.

use crate::core::binder::{PageMetadata, TenantPage};
use crate::core::forms::escape_html;
use crate::core::theme::THEME_STYLE_ID;
use crate::utils::error::Result;

pub const TENANT_DATA_ID: &str = "tenant-data";

fn head(metadata: &PageMetadata, style: &str) -> String {
    let mut head = String::new();
    head.push_str("<meta charset=\"utf-8\">\n");
    head.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    head.push_str(&format!("<title>{}</title>\n", escape_html(&metadata.title)));
    head.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        escape_html(&metadata.description)
    ));
    head.push_str(&format!(
        "<link rel=\"icon\" href=\"{}\">\n",
        escape_html(&metadata.icon)
    ));
    head.push_str(&format!(
        "<link rel=\"apple-touch-icon\" href=\"{}\">\n",
        escape_html(&metadata.apple_icon)
    ));
    head.push_str(style);
    head
}

/// JSON that is safe inside a `<script>` element.
fn script_safe_json(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

pub fn render_tenant_page(page: &TenantPage) -> Result<String> {
    let style = if page.theme.is_empty() {
        String::new()
    } else {
        format!(
            "<style id=\"{}\">\n{}\n</style>\n",
            THEME_STYLE_ID,
            page.theme.to_css()
        )
    };
    let data = script_safe_json(page)?;

    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n{}</head>\n<body>\n<main id=\"tenant-root\" data-tenant=\"{}\"></main>\n<script type=\"application/json\" id=\"{}\">{}</script>\n</body>\n</html>\n",
        head(&page.metadata, &style),
        page.slug,
        TENANT_DATA_ID,
        data
    ))
}

pub fn render_not_found(apex: &str) -> String {
    let metadata = PageMetadata::not_found();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n{}</head>\n<body>\n<main>\n<h1>{}</h1>\n<p>{}</p>\n<a href=\"https://{}\">Go to {}</a>\n</main>\n</body>\n</html>\n",
        head(&metadata, ""),
        escape_html(&metadata.title),
        escape_html(&metadata.description),
        escape_html(apex),
        escape_html(apex)
    )
}
