/// Parse `--max-workers`: a positive integer.
///
/// Zero is rejected here; use `--no-fork` to minify in-process.
pub fn parse_max_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", s))?;

    if value == 0 {
        return Err("at least one worker is required (use --no-fork to disable workers)".to_string());
    }

    Ok(value)
}
