#[cfg(test)]
mod verify {
    use markshow::external::Dependencies;
    use markshow::scanning::{Scanner, Segment};

    use crate::recording::{flatten, profile, Recording};

    #[test]
    fn mermaid_inside_a_code_fence_is_text() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        // the inner ``` closes the outer fence, so what follows is text
        // again; the mermaid tag on it opens nothing while in a code fence.
        let document = "```text\n```mermaid\ngraph TD\n```\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .scan(document, &mut segments)
            .unwrap();

        let flat = flatten(&segments);
        assert_eq!(flat.len(), 1);
        assert!(flat[0].contains("graph TD"));
        assert!(surface
            .requests()
            .is_empty());
    }

    #[test]
    fn blank_runs_are_not_emitted() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "\n\n   \n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .scan(document, &mut segments)
            .unwrap();

        assert!(segments.is_empty());
    }

    #[test]
    fn plain_document_is_one_segment() {
        let surface = Recording::new();
        let profile = profile();
        let dependencies = Dependencies::assume(false);

        let document = "# Title\n\nSome *emphasis* and `code`.\n\n- one\n- two\n";
        let mut segments: Vec<Segment> = Vec::new();
        Scanner::new(&surface, &profile, &dependencies)
            .scan(document, &mut segments)
            .unwrap();

        assert_eq!(flatten(&segments), vec![document.to_string()]);
    }
}
