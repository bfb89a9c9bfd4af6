pub fn render_password_reset(reset_link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>Hello,</p>
    <p>Use the link below to reset your Dahlia password:</p>
    <p><a href="{reset_link}">{reset_link}</a></p>
    <p style="color: #666; font-size: 14px;">This link is valid for 30 minutes. If you didn't request a reset, you can ignore this email.</p>
</body>
</html>"#
    )
}
