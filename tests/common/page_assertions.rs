/// Assert the number of pages a table was split onto
#[macro_export]
macro_rules! assert_page_count {
    ($rendered:expr, $count:expr) => {
        assert_eq!(
            $rendered.page_count(),
            $count,
            "Expected {} pages, got {}. Output was:\n{}",
            $count,
            $rendered.page_count(),
            $rendered.text
        );
    };
}

/// Assert the exact data lines of one page (zero based)
#[macro_export]
macro_rules! assert_page_lines {
    ($rendered:expr, $page:expr, $lines:expr) => {
        let expected: Vec<&str> = $lines.to_vec();
        assert_eq!(
            $rendered.page_lines($page),
            expected,
            "Unexpected lines on page {}. Output was:\n{}",
            $page,
            $rendered.text
        );
    };
}

/// Assert that the rendered output contains a line
#[macro_export]
macro_rules! assert_output_contains_line {
    ($rendered:expr, $line:expr) => {
        assert!(
            $rendered.text.lines().any(|l| l == $line),
            "Output should contain the line '{}', but was:\n{}",
            $line,
            $rendered.text
        );
    };
}
