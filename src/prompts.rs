pub const ARCHITECT: &str = include_str!("../data/prompts/architect.txt");
pub const RENDERER: &str = include_str!("../data/prompts/renderer.txt");
pub const RENDERER_WITH_REFERENCES: &str =
    include_str!("../data/prompts/renderer_with_references.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
