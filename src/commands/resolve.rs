use crate::location::{self, LocationKind};

/// Describe what the location bar would do with `text`
pub fn format_resolution(text: &str) -> String {
    let url = location::resolve_str(text);
    let mut output = format!("{}\n", url);
    match location::classify(&url) {
        LocationKind::Page => {}
        LocationKind::Pdf => output.push_str("(PDF document)\n"),
        LocationKind::Downloadable(ext) => {
            output.push_str(&format!("(downloadable {} file)\n", ext));
        }
    }
    output
}

pub fn run(words: &[String]) {
    print!("{}", format_resolution(&words.join(" ")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_resolution() {
        assert_eq!(format_resolution("google cats"), "http://www.google.com/search?q=cats\n");
        assert_eq!(
            format_resolution("example.com/setup.jar"),
            "http://example.com/setup.jar\n(downloadable .jar file)\n"
        );
        assert_eq!(format_resolution("a.com/doc.pdf"), "http://a.com/doc.pdf\n(PDF document)\n");
    }
}
