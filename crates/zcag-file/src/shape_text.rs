//! 形状文本格式
//!
//! 一个形状写成一行以空白分隔的记号：可选的环绕规则
//! `evenodd` / `nonzero`，随后是命令 `m x y`、`l x y`、`q cx cy x y`、
//! `c cx1 cy1 cx2 cy2 x y` 和 `z`。
//!
//! ```text
//! evenodd m 0 0 l 10 0 l 10 10 l 0 10 z m 2 2 l 8 2 l 8 8 l 2 8 z
//! ```

use crate::error::FileError;
use std::fmt::Write;
use zcag_core::path::{Path, PathCommand, PathSource, WindingRule};

/// 输出一个形状
pub fn format_shape(source: &dyn PathSource) -> String {
    let mut out = String::from(match source.winding_rule() {
        WindingRule::EvenOdd => "evenodd",
        WindingRule::NonZero => "nonzero",
    });
    for cmd in source.path_iter(None) {
        // 写入 String 不会失败
        let _ = match cmd {
            PathCommand::MoveTo { x, y } => write!(out, " m {x} {y}"),
            PathCommand::LineTo { x, y } => write!(out, " l {x} {y}"),
            PathCommand::QuadTo { cx, cy, x, y } => write!(out, " q {cx} {cy} {x} {y}"),
            PathCommand::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => write!(out, " c {cx1} {cy1} {cx2} {cy2} {x} {y}"),
            PathCommand::Close => write!(out, " z"),
        };
    }
    out
}

/// 解析一个形状
pub fn parse_shape(text: &str) -> Result<Path, FileError> {
    parse_shape_at(text, 1)
}

/// 解析一个形状，错误中报告给定的行号
pub(crate) fn parse_shape_at(text: &str, line: usize) -> Result<Path, FileError> {
    let error = |index: usize, message: String| FileError::Parse {
        line,
        message: format!("token {}: {message}", index + 1),
    };

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut pos = 0;
    let mut path = Path::new(WindingRule::NonZero);
    match tokens.first().map(|t| t.to_ascii_lowercase()) {
        Some(t) if t == "evenodd" => {
            path.winding_rule = WindingRule::EvenOdd;
            pos = 1;
        }
        Some(t) if t == "nonzero" => pos = 1,
        _ => {}
    }

    let mut started = false;
    while pos < tokens.len() {
        let op = tokens[pos];
        let arity = match op {
            "m" | "M" | "l" | "L" => 2,
            "q" | "Q" => 4,
            "c" | "C" => 6,
            "z" | "Z" => 0,
            other => return Err(error(pos, format!("unknown command '{other}'"))),
        };
        if !started && !matches!(op, "m" | "M") {
            return Err(error(pos, format!("expected 'm' before '{op}'")));
        }
        started = true;

        let mut args = [0.0f64; 6];
        for (k, slot) in args.iter_mut().take(arity).enumerate() {
            let index = pos + 1 + k;
            let token = tokens
                .get(index)
                .ok_or_else(|| error(index, format!("'{op}' expects {arity} numbers")))?;
            let value: f64 = token
                .parse()
                .map_err(|_| error(index, format!("invalid number '{token}'")))?;
            if !value.is_finite() {
                return Err(error(index, format!("non-finite number '{token}'")));
            }
            *slot = value;
        }
        let a = args;
        match op {
            "m" | "M" => path.move_to(a[0], a[1]),
            "l" | "L" => path.line_to(a[0], a[1]),
            "q" | "Q" => path.quad_to(a[0], a[1], a[2], a[3]),
            "c" | "C" => path.cubic_to(a[0], a[1], a[2], a[3], a[4], a[5]),
            _ => path.close(),
        };
        pos += 1 + arity;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_rule_and_curves() {
        let path = parse_shape("evenodd m 0 0 q 5 -5 10 0 C 10 5 5 10 0 10 z").unwrap();
        assert_eq!(path.winding_rule, WindingRule::EvenOdd);
        assert_eq!(path.commands.len(), 4);
        assert_eq!(
            path.commands[1],
            PathCommand::QuadTo {
                cx: 5.0,
                cy: -5.0,
                x: 10.0,
                y: 0.0
            }
        );
        assert_eq!(path.commands[3], PathCommand::Close);
    }

    #[test]
    fn test_default_rule_is_non_zero() {
        let path = parse_shape("m 1 2 l 3 4").unwrap();
        assert_eq!(path.winding_rule, WindingRule::NonZero);
        assert!(parse_shape("").unwrap().is_empty());
    }

    #[test]
    fn test_format_then_parse() {
        let rect = Path::rectangle(0.5, 1.0, 2.0, 3.25);
        let text = format_shape(&rect);
        assert!(text.starts_with("nonzero m 0.5 1 l 2.5 1"));
        assert_eq!(parse_shape(&text).unwrap(), rect);
    }

    #[test]
    fn test_errors_report_token_position() {
        let err = parse_shape("m 0 0 l 1 x").unwrap_err();
        assert!(matches!(&err, FileError::Parse { line: 1, message } if message.starts_with("token 6")));
        assert!(parse_shape("l 1 1").is_err());
        assert!(parse_shape("m 0 0 k 1 1").is_err());
        assert!(parse_shape("m 0 0 l 1").is_err());
        assert!(parse_shape("m 0 0 l inf 1").is_err());
    }
}
