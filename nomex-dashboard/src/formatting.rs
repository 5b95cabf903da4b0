use chrono::{DateTime, Utc};
use nomex_types::{Post, COLLAPSED_BODY_CHARS};

/// Format timestamp for display
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Human-friendly age of an item relative to `now`.
///
/// Anything older than a week falls back to the calendar date.
pub fn format_relative_time(created_at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*created_at);

    // Clock skew can put fresh items slightly in the future
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    if elapsed.num_hours() < 1 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_days() < 1 {
        return format!("{}h ago", elapsed.num_hours());
    }
    if elapsed.num_days() < 7 {
        return format!("{}d ago", elapsed.num_days());
    }
    created_at.format("%b %-d, %Y").to_string()
}

/// Collapsed post body with a "read more" marker when cut off
pub fn format_preview(post: &Post) -> String {
    match post.preview(COLLAPSED_BODY_CHARS) {
        (text, true) => format!("{}... read more", text.trim_end()),
        (text, false) => text.to_string(),
    }
}

/// Single line summary of a post for the headless feed listing
pub fn format_post_line(post: &Post, now: &DateTime<Utc>) -> String {
    let mut line = format!(
        "#{} {} · {}",
        post.id,
        post.author.display_name(),
        format_relative_time(&post.created_at, now)
    );
    if let Some(persona) = post.author.persona_kind() {
        line.push_str(&format!(" [{}]", persona.label()));
    }
    if let Some(headline) = post.author.headline() {
        line.push_str(&format!(" ({})", headline));
    }

    let body = format_preview(post);
    if !body.is_empty() {
        line.push_str(&format!(": {}", body));
    }
    if post.has_image() {
        line.push_str(" [image]");
    }
    if post.has_video() {
        line.push_str(" [video]");
    }
    line
}
