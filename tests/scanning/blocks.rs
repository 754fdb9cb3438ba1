#[cfg(test)]
mod verify {
    use std::fs;

    use markshow::external::Dependencies;
    use markshow::profile::Alignment;
    use markshow::scanning::{ScanOptions, Scanner, Segment};

    use crate::recording::{flatten, profile, remaining, Recording};

    #[test]
    fn images_stay_in_document_order() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");
        fs::write(
            directory
                .path()
                .join("one.svg"),
            "first",
        )
        .unwrap();
        fs::write(
            directory
                .path()
                .join("two.svg"),
            "second",
        )
        .unwrap();

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "Start\n\n![one](one.svg)\n\nMiddle\n\n![two](two.svg)\n\nEnd\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_base(directory.path())
            .scan(document, &mut segments)
            .unwrap();

        assert_eq!(
            flatten(&segments),
            vec!["Start\n\n", "<graphic 1>", "Middle\n\n", "<graphic 2>", "End\n"]
        );

        let requests = surface.requests();
        assert_eq!(requests[0].content, "first");
        assert_eq!(requests[1].content, "second");
        assert_eq!(requests[0].path, directory.path().join("one.svg"));
    }

    #[test]
    fn unusable_images_become_placeholders() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "![logo](https://example.com/logo.png)\n![gone](pictures/missing.png)\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_base(directory.path())
            .scan(document, &mut segments)
            .unwrap();

        let flat = flatten(&segments);
        assert_eq!(flat.len(), 2);
        assert_eq!(
            flat[0],
            "[Image: https://example.com/logo.png - remote images are not displayed]"
        );
        assert!(flat[1].starts_with("[Image: missing.png - "));
        assert!(surface
            .requests()
            .is_empty());
    }

    #[test]
    fn image_syntax_in_code_fences_is_left_alone() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "```markdown\n![one](one.png)\n<svg><rect/></svg>\n```\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .scan(document, &mut segments)
            .unwrap();

        assert_eq!(flatten(&segments), vec![document.to_string()]);
        assert!(surface
            .requests()
            .is_empty());
    }

    #[test]
    fn inline_vector_is_rendered_and_removed() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "Before\n<div align=\"right\">\n<svg width=\"10\" height=\"10\">\n  <text>A & B</text>\n</svg>\n</div>\nAfter\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_directory(
                directory
                    .path()
                    .to_path_buf(),
            )
            .scan(document, &mut segments)
            .unwrap();

        assert_eq!(
            flatten(&segments),
            vec!["Before\n", "<graphic 1>", "After\n"]
        );

        let requests = surface.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .content
            .contains("A &amp; B"));
        assert!(requests[0]
            .content
            .contains("xmlns"));
        assert_eq!(requests[0].placement.alignment, Alignment::Right);
        assert!(requests[0].placement.transparent);

        assert!(remaining(directory.path()).is_empty());
    }

    #[test]
    fn unclosed_vector_is_ordinary_text() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let mut document = String::from("<svg width=\"10\">\n");
        for i in 0..300 {
            document.push_str(&format!("line {}\n", i));
        }

        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .scan(&document, &mut segments)
            .unwrap();

        assert_eq!(flatten(&segments), vec![document.clone()]);
    }

    #[test]
    fn closing_tag_beyond_the_window_is_not_found() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let mut document = String::from("<svg>\n");
        for _ in 0..20 {
            document.push_str("<rect/>\n");
        }
        document.push_str("</svg>\n");

        let options = ScanOptions {
            lookahead: 10,
            ..ScanOptions::default()
        };

        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_options(options)
            .scan(&document, &mut segments)
            .unwrap();

        assert_eq!(flatten(&segments), vec![document.clone()]);
        assert!(surface
            .requests()
            .is_empty());
    }
}
