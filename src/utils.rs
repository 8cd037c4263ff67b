use crate::types::TrackDescriptor;

const UNSAFE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

pub fn sanitize_file_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

pub fn search_query(track: &TrackDescriptor) -> String {
    format!("{} {}", track.title, track.artists.join(" "))
}

pub fn output_file_name(track: &TrackDescriptor) -> String {
    format!(
        "{} - {}.mp3",
        sanitize_file_component(&track.title),
        sanitize_file_component(&track.artists.join(" "))
    )
}
