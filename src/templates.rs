use tera::Tera;

use crate::config::QUOTE_TEMPLATE;
use crate::error::AppError;
use crate::store::Quote;

/// Quote fragment. The `.html` name keeps Tera's autoescaping on for every variable.
const QUOTE_HTML: &str = r#"
<div style="font-family: Arial; margin: 50px;">
  <h1>Random Quote</h1>
  <p style="font-size: 1.2rem;">"{{ quote.text }}"</p>
  <p><strong>- {{ quote.author }}</strong></p>
</div>
"#;

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template(QUOTE_TEMPLATE, QUOTE_HTML)?;
    Ok(tera)
}

/// Render a quote as an HTML fragment.
pub fn render_quote(tera: &Tera, quote: &Quote) -> Result<String, AppError> {
    let mut context = tera::Context::new();
    context.insert("quote", quote);
    Ok(tera.render(QUOTE_TEMPLATE, &context)?)
}
