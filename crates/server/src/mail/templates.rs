//! Email templates.

/// Escape text for interpolation into HTML.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Content of a relayed contact-form message.
pub struct ContactEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ContactEmailContent {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            subject: format!("New contact form message from {}", name),
            text: format!(
                "You have received a new message from the Maharitage contact form.\n\n\
                 Name: {}\nEmail: {}\n\nMessage:\n{}\n",
                name, email, message
            ),
            html: Self::html_template(name, email, message),
        }
    }

    fn html_template(name: &str, email: &str, message: &str) -> String {
        let message_html = escape_html(message).replace('\n', "<br>");
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body style="font-family: Georgia, 'Times New Roman', serif; color: #2d2a26;">
    <h2>New contact form message</h2>
    <p><strong>Name:</strong> {}</p>
    <p><strong>Email:</strong> {}</p>
    <p><strong>Message:</strong></p>
    <p>{}</p>
</body>
</html>"#,
            escape_html(name),
            escape_html(email),
            message_html
        )
    }
}

/// Content of the email-verification message sent after signup.
pub struct VerificationEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl VerificationEmailContent {
    pub fn new(name: &str, link: &str, ttl_hours: i64) -> Self {
        Self {
            subject: "Verify your Maharitage account".to_string(),
            text: format!(
                r#"Namaskar {},

Please confirm your email address by opening the link below:

{}

This link will expire in {} hours.

If you did not create a Maharitage account, you can ignore this email."#,
                name, link, ttl_hours
            ),
            html: format!(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body style="font-family: Georgia, 'Times New Roman', serif; color: #2d2a26;">
    <h2>Namaskar {},</h2>
    <p>Please confirm your email address to finish setting up your Maharitage account.</p>
    <p><a href="{}" style="background: #8b4513; color: #fff; padding: 10px 18px; text-decoration: none; border-radius: 4px;">Verify email</a></p>
    <p style="color: #777; font-size: 13px;">This link will expire in {} hours.</p>
    <p style="color: #777; font-size: 13px;">If you did not create a Maharitage account, you can ignore this email.</p>
</body>
</html>"#,
                escape_html(name),
                escape_html(link),
                ttl_hours
            ),
        }
    }
}
