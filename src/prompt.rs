// Maps free-form form requests onto the canned descriptions the markup
// model responds well to. Matching is case-insensitive and substring-based
// ("deregister" hits the registration template), first match wins.

const LEAVE_TEMPLATE: &str = "Generate a professional leave form using TailwindCSS with \
     full name, employee ID, leave type, start/end date, reason, and signature.";

const CERTIFICATE_TEMPLATE: &str = "Create a certificate request form with TailwindCSS, \
     asking for full name, student ID, course, semester, reason, and contact info.";

const REGISTER_TEMPLATE: &str = "Build a user registration form using TailwindCSS with \
     name, email, phone, gender, address, password, and confirmation.";

/// Pick the form description to send to the markup model for this input.
pub fn enhance_prompt(user_input: &str) -> String {
    let lower = user_input.to_lowercase();
    if lower.contains("leave") {
        LEAVE_TEMPLATE.to_string()
    } else if lower.contains("certificate") {
        CERTIFICATE_TEMPLATE.to_string()
    } else if lower.contains("register") {
        REGISTER_TEMPLATE.to_string()
    } else {
        format!("Generate a detailed TailwindCSS form for: {}", user_input)
    }
}
