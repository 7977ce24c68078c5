use std::path::Path;

pub struct FileUtils;

impl FileUtils {
    //Path to string, lossy on purpose since it only ends up in log messages.
    pub fn pts(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    pub fn file_name(path: &Path) -> String {
        path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| Self::pts(path))
    }
}

/// Rounds half up to two decimal places.
pub fn round_hundredths(value: f32) -> f32 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// The number a generated name ends with, e.g. `joint12` -> 12.
pub fn trailing_number(name: &str) -> Option<u32> {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    name[name.len() - digits..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_hundredths(0.044), 0.04);
        assert_eq!(round_hundredths(0.045), 0.05);
        assert_eq!(round_hundredths(-1.006), -1.01);
        assert_eq!(round_hundredths(3.0), 3.0);
    }

    #[test]
    fn trailing_numbers() {
        assert_eq!(trailing_number("joint0"), Some(0));
        assert_eq!(trailing_number("joint12"), Some(12));
        assert_eq!(trailing_number("hip"), None);
        assert_eq!(trailing_number("42"), Some(42));
    }

    #[test]
    fn file_name_of_nested_path() {
        assert_eq!(FileUtils::file_name(Path::new("models/arm.gltf")), "arm.gltf");
    }
}
