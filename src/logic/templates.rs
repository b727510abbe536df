use crate::error::{Result, SkywiseError};
use crate::logic::random::RandomSource;
use regex_lite::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Fill `{name}` placeholders. A placeholder with no matching value is an error.
pub fn render(template: &str, vars: &[(&str, String)]) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = vars
            .iter()
            .find(|(key, _)| *key == name.as_str())
            .map(|(_, v)| v)
            .ok_or_else(|| {
                SkywiseError::Template(format!(
                    "no value for {{{}}} in \"{}\"",
                    name.as_str(),
                    template
                ))
            })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Pick one template uniformly and render it
pub fn choose_and_render(
    templates: &[&str],
    vars: &[(&str, String)],
    rng: &mut dyn RandomSource,
) -> Result<String> {
    if templates.is_empty() {
        return Err(SkywiseError::Template("no templates to choose from".into()));
    }
    let template = templates[rng.index(templates.len())];
    render(template, vars)
}

/// Format a threshold the way messages show it: "32", "2.5"
pub fn number(value: f64) -> String {
    format!("{}", value)
}
