#[cfg(test)]
mod verify {
    use markshow::external::Dependencies;
    use markshow::output::TerminalSurface;
    use markshow::profile::{Scale, ScaleMode};
    use markshow::scanning::{Scanner, Segment};
    use markshow::sizing::Protocol;

    use crate::recording::{flatten, profile, remaining, Recording};

    #[test]
    fn diagram_without_compiler_is_a_placeholder() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "intro\n\n```mermaid\ngraph TD; A-->B\n```\n\nmore text\n";
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
            vec!["intro\n\n", "<graphic 1>", "more text\n"]
        );

        let requests = surface.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .content
            .starts_with("<svg"));
        assert!(requests[0]
            .content
            .contains("mermaid-cli (mmdc) is not installed"));
        assert_eq!(requests[0].placement.scale, Scale::Mode(ScaleMode::None));

        // the placeholder existed while the surface was looking at it, and
        // not afterwards.
        assert!(requests[0]
            .path
            .starts_with(directory.path()));
        assert!(remaining(directory.path()).is_empty());
    }

    #[test]
    fn terminal_without_any_tools_shows_placeholder_line() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let profile = profile();
        let dependencies = Dependencies::assume(false);
        let surface = TerminalSurface::new(&profile, &dependencies, Protocol::Inline, 80);

        let document = "intro\n\n```mermaid\ngraph TD\nA-->B\n```\n\nmore text\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_directory(
                directory
                    .path()
                    .to_path_buf(),
            )
            .scan(document, &mut segments)
            .unwrap();

        assert_eq!(segments.len(), 3);
        match &segments[0] {
            Segment::Text(text) => assert!(text.contains("intro")),
            other => panic!("Expected text, got {:?}", other),
        }
        match &segments[1] {
            Segment::Graphic(graphic) => {
                let shown = String::from_utf8_lossy(&graphic.bytes);
                assert!(shown.contains(
                    "[Diagram: mermaid-cli (mmdc) not installed - npm install -g @mermaid-js/mermaid-cli]"
                ));
                assert!(!shown.contains("graph TD"));
            }
            other => panic!("Expected a graphic, got {:?}", other),
        }
        match &segments[2] {
            Segment::Text(text) => assert!(text.contains("more text")),
            other => panic!("Expected text, got {:?}", other),
        }

        assert!(remaining(directory.path()).is_empty());
    }

    #[test]
    fn empty_diagram_is_shown_as_code() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "```mermaid\n```\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .with_directory(
                directory
                    .path()
                    .to_path_buf(),
            )
            .scan(document, &mut segments)
            .unwrap();

        let flat = flatten(&segments);
        assert_eq!(flat.len(), 1);
        assert!(flat[0].starts_with("```mermaid\n```\n"));
        assert!(flat[0].contains("> Diagram could not be rendered: the diagram is empty"));
        assert!(remaining(directory.path()).is_empty());
    }

    #[test]
    fn unclosed_diagram_is_literal_text() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "Heading\n```mermaid\ngraph TD\n  A-->B\n";
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
    fn diagrams_render_one_after_another() {
        let directory = tempfile::tempdir().expect("Failed to create scratch directory");

        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "```mermaid\ngraph LR; X-->Y\n```\nbetween\n```mermaid\ngraph LR; X-->Y\n```\n";
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
            vec!["<graphic 1>", "between\n", "<graphic 2>"]
        );
        assert!(remaining(directory.path()).is_empty());
    }
}
