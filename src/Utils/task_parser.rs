/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values into HashMap<String, HashMap<String, Option<Vec<Value>>>>.
/// Keys requested by a template but absent from the document end up as key: None.
///
/// Lines starting with //, #, % or ; are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;

/// scalar found in a value list
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted as floats: "a: 32" is as good as "a: 32.0"
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letter or underscore, then letters, digits, underscores
fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Parses a title, whitespace after it is dropped
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = identifier(input)?;
    Ok((input.trim(), result))
}

fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

/// single value, tried as integer, float, boolean and finally kept as a string
fn parse_value(input: &str) -> IResult<&str, Value> {
    let token = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map_res(token, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

/// comma separated values, spaces around commas allowed
fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = multispace0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list0(separator_coma, parse_value).parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// title followed by at least one key-value pair; the section ends at the first word
/// that is not followed by a colon
fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, space0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// drops comment lines (starting with //, #, %, or ;) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the document into a HashMap, comments must be filtered beforehand
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;

    let mut result = HashMap::new();
    for (title, section_map) in sections {
        let title_map: SectionMap = section_map
            .into_iter()
            .map(|(key, values)| (key, Some(values)))
            .collect();
        result.insert(title, title_map);
    }
    Ok((input, result))
}

fn parse_complete(input: &str) -> Result<DocumentMap, String> {
    match parse_document(input) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// every title and key of the template is present in the result, missing keys are None
fn parse_document_with_template(input: &str, template: &DocumentMap) -> Result<DocumentMap, String> {
    let mut parsed = parse_complete(input)?;
    for (title, keys_map) in template {
        let section_map = parsed.entry(title.clone()).or_default();
        for key in keys_map.keys() {
            section_map.entry(key.clone()).or_insert(None);
        }
    }
    Ok(parsed)
}

/// strip comments and parse, optionally filling in the keys of a template
pub fn parse_document_as(input: &str, template: Option<DocumentMap>) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    match template {
        Some(template) => parse_document_with_template(&filtered, &template),
        None => parse_complete(&filtered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_title_and_key() {
        let (remaining, title) = parse_title("equation\n a: 1").unwrap();
        assert_eq!(title, "equation");
        assert_eq!(remaining, "a: 1");

        let (remaining, key) = parse_key("save_log: false").unwrap();
        assert_eq!(key, "save_log");
        assert_eq!(remaining, ": false");

        let (remaining, key) = parse_key("x0: -2").unwrap();
        assert_eq!(key, "x0");
        assert_eq!(remaining, ": -2");

        assert!(parse_key("0x: 1").is_err());
    }

    #[test]
    fn test_parse_value_types() {
        let (remaining, value) = parse_value("-5 x1: 7").unwrap();
        assert_eq!(value, Value::Integer(-5));
        assert_eq!(remaining, " x1: 7");

        let (_, value) = parse_value("1e-3,").unwrap();
        assert_eq!(value, Value::Float(1e-3));

        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));

        let (_, value) = parse_value("robin").unwrap();
        assert_eq!(value, Value::String("robin".to_string()));
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("20, 40 ,80").unwrap();
        assert_eq!(
            values,
            vec![Value::Integer(20), Value::Integer(40), Value::Integer(80)]
        );
        assert_eq!(remaining, "");

        let (remaining, values) = parse_value_list("").unwrap();
        assert!(values.is_empty());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_several_pairs_on_one_line() {
        let (remaining, (title, map)) = parse_section("equation a: 32 b: 9.5 c: 0 d: 23").unwrap();
        assert_eq!(title, "equation");
        assert_eq!(remaining, "");
        assert_eq!(map.len(), 4);
        assert_eq!(map["a"], vec![Value::Integer(32)]);
        assert_eq!(map["b"], vec![Value::Float(9.5)]);
    }

    #[test]
    fn test_section_stops_at_next_title() {
        let (remaining, (title, map)) =
            parse_section("left kind: robin value: 32\nright kind: dirichlet").unwrap();
        assert_eq!(title, "left");
        assert_eq!(map.len(), 2);
        assert_eq!(remaining, "right kind: dirichlet");
    }

    #[test]
    fn test_parse_document_with_comments() {
        let input = r#"
        // coefficients
        equation
          a: 1 b: 0 c: -1 d: 1
          x0: 0 x1: 1
        # conditions
        left
          kind: dirichlet value: 0.5
        right
          kind: dirichlet
          value: 2
        "#;
        let doc = parse_document_as(input, None).unwrap();
        assert_eq!(doc.len(), 3);
        let equation = &doc["equation"];
        assert_eq!(equation.len(), 6);
        assert_eq!(
            equation["c"].as_ref().unwrap()[0].as_float(),
            Some(-1.0)
        );
        assert_eq!(
            doc["right"]["kind"].as_ref().unwrap()[0].as_string(),
            Some(&"dirichlet".to_string())
        );
    }

    #[test]
    fn test_template_fills_missing_keys() {
        let input = "solver elements: 20";
        let mut template: DocumentMap = HashMap::new();
        template.insert(
            "solver".to_string(),
            HashMap::from([
                ("elements".to_string(), None),
                ("scheme".to_string(), None),
            ]),
        );
        template.insert(
            "search".to_string(),
            HashMap::from([("target".to_string(), None)]),
        );
        let doc = parse_document_as(input, Some(template)).unwrap();
        assert_eq!(doc["solver"]["elements"], Some(vec![Value::Integer(20)]));
        assert_eq!(doc["solver"]["scheme"], None);
        assert_eq!(doc["search"]["target"], None);
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_document_as("", None).is_err());
        assert!(parse_document_as("equation", None).is_err());
        assert!(parse_document_as("equation a: 1 ::", None).is_err());
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("task.txt");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "solver").unwrap();
        writeln!(file, "  elements: 20, 40").unwrap();
        writeln!(file, "  scheme: linear, cubic").unwrap();
        writeln!(file, "  save_log: false").unwrap();

        let mut contents = String::new();
        File::open(&file_path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        let doc = parse_document_as(&contents, None).unwrap();
        let solver = &doc["solver"];
        assert_eq!(
            solver["scheme"].as_ref().unwrap(),
            &vec![
                Value::String("linear".to_string()),
                Value::String("cubic".to_string())
            ]
        );
        assert_eq!(solver["save_log"].as_ref().unwrap()[0].as_boolean(), Some(false));
    }
}
