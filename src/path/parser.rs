use crate::geometry::{Point, PointSequence};

/// Extract coordinate pairs from an SVG path description
///
/// # Algorithm
/// 1. Find every move/line command character (`M`, `m`, `L`, `l`)
/// 2. After optional whitespace, read a run of numbers separated by
///    whitespace (`-?digits(.digits)?`); a run needs at least two numbers,
///    otherwise the command contributes nothing
/// 3. Pair the numbers in order, dropping an odd trailing one
///
/// Pairs from all commands are concatenated into one sequence. Relative
/// commands are taken at face value. Any other command, comma separators and
/// exponent notation are not recognized.
pub fn extract_points(d: &str) -> PointSequence {
    let bytes = d.as_bytes();
    let mut points = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        if !matches!(b, b'M' | b'm' | b'L' | b'l') {
            continue;
        }

        let numbers = scan_number_run(d, i + 1);
        points.extend(
            numbers
                .chunks_exact(2)
                .map(|pair| Point::new(pair[0], pair[1])),
        );
    }

    PointSequence::new(points)
}

/// Read whitespace-separated numbers starting at `start`
///
/// Returns an empty list unless at least two numbers were found.
fn scan_number_run(d: &str, start: usize) -> Vec<f64> {
    let mut pos = skip_whitespace(d, start);
    let mut numbers = Vec::new();

    let Some((first, end)) = scan_number(d, pos) else {
        return numbers;
    };
    numbers.push(first);
    pos = end;

    loop {
        let after_space = skip_whitespace(d, pos);
        if after_space == pos {
            break;
        }
        match scan_number(d, after_space) {
            Some((value, end)) => {
                numbers.push(value);
                pos = end;
            }
            None => break,
        }
    }

    if numbers.len() < 2 {
        numbers.clear();
    }
    numbers
}

fn skip_whitespace(d: &str, start: usize) -> usize {
    match d[start..].find(|c: char| !c.is_whitespace()) {
        Some(offset) => start + offset,
        None => d.len(),
    }
}

/// Match `-?\d+(\.\d+)?` at `start`, returning the value and end offset
///
/// Digit runs too long to fit an `f64` are treated as malformed.
fn scan_number(d: &str, start: usize) -> Option<(f64, usize)> {
    let bytes = d.as_bytes();
    let mut pos = start;

    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }

    let int_end = skip_digits(bytes, pos);
    if int_end == pos {
        return None;
    }
    pos = int_end;

    if bytes.get(pos) == Some(&b'.') {
        let frac_end = skip_digits(bytes, pos + 1);
        if frac_end > pos + 1 {
            pos = frac_end;
        }
    }

    d[start..pos]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| (value, pos))
}

fn skip_digits(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}
