/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests of the task file parser:
elementary parsers
sections and documents
string conversion
file-based parsing
expressions as values
*/

#[cfg(test)]
mod tests1 {
    use crate::Utils::task_parser::{
        Value, parse_document, parse_key, parse_key_value_pair, parse_section, parse_title,
        parse_value, parse_value_list,
    };

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("series\n period: 2").unwrap();
        assert_eq!(title, "series");
        assert_eq!(remaining, "period: 2");

        let (remaining, title) = parse_title("plot_settings step: 0.01").unwrap();
        assert_eq!(title, "plot_settings");
        assert_eq!(remaining, "step: 0.01");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("limits12: 0, 1").unwrap();
        assert_eq!(key, "limits12");
        assert_eq!(remaining, ": 0, 1");

        let (remaining, key) = parse_key("real_harmonics: 100").unwrap();
        assert_eq!(key, "real_harmonics");
        assert_eq!(remaining, ": 100");

        assert!(parse_key("1f: t").is_err());
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("-pi, pi").unwrap();
        assert_eq!(value, Value::String("-pi".to_string()));
        assert_eq!(remaining, ", pi");

        let (remaining, value) = parse_value("10\n").unwrap();
        assert_eq!(value, Value::Integer(10));
        assert_eq!(remaining, "\n");

        let (_, value) = parse_value("0.01").unwrap();
        assert_eq!(value, Value::Float(0.01));

        let (_, value) = parse_value("false;").unwrap();
        assert_eq!(value, Value::Boolean(false));
    }

    #[test]
    fn test_expression_values() {
        // expressions are single values as long as they have no spaces
        let (remaining, values) = parse_value_list("exp(-t)*sin(2*pi*t)").unwrap();
        assert_eq!(
            values,
            vec![Value::String("exp(-t)*sin(2*pi*t)".to_string())]
        );
        assert_eq!(remaining, "");

        let (_, values) = parse_value_list("t^2+1, 3*t").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1], Value::String("3*t".to_string()));
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("limits1 : -1 , 1").unwrap();
        assert_eq!(key, "limits1");
        assert_eq!(values, vec![Value::Integer(-1), Value::Integer(1)]);
        assert_eq!(remaining, "");

        let (remaining, (key, values)) = parse_key_value_pair("mode: numeric;").unwrap();
        assert_eq!(key, "mode");
        assert_eq!(values, vec![Value::String("numeric".to_string())]);
        assert_eq!(remaining, ";");
    }

    #[test]
    fn test_parse_section() {
        let input = "pieces f1: 1 limits1: 0, 1 f2: 0 limits2: 1, 2";
        let (remaining, (title, map)) = parse_section(input).unwrap();
        assert_eq!(title, "pieces");
        assert_eq!(map.len(), 4);
        assert_eq!(map["f2"], vec![Value::Integer(0)]);
        assert_eq!(map["limits2"], vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(remaining, "");

        let input = "series period: 2 harmonics: 10\nplot";
        let (remaining, (title, map)) = parse_section(input).unwrap();
        assert_eq!(title, "series");
        assert_eq!(map.len(), 2);
        assert_eq!(remaining, "plot");
    }

    #[test]
    fn test_parse_document() {
        let input = "series\n period: 2*pi\n harmonics: 20\npieces\n f1: t\n limits1: -pi, pi\n";
        let (remaining, doc) = parse_document(input).unwrap();
        assert_eq!(remaining, "");
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc["series"]["period"].as_ref().unwrap(),
            &vec![Value::String("2*pi".to_string())]
        );
        assert_eq!(
            doc["pieces"]["limits1"].as_ref().unwrap(),
            &vec![
                Value::String("-pi".to_string()),
                Value::String("pi".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_document_empty() {
        assert!(parse_document("").is_err());
    }
}

#[cfg(test)]
mod tests2 {
    use crate::Utils::task_parser::{Value, parse_document_as, parse_document_as_strings};
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_document_values() {
        let input = "series\n period: 4\n step: 0.01\nplot\n enabled: true\n";
        let result = parse_document_as(input).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result["series"]["period"].as_ref().unwrap(),
            &vec![Value::Integer(4)]
        );
        assert_eq!(
            result["series"]["step"].as_ref().unwrap(),
            &vec![Value::Float(0.01)]
        );
        assert_eq!(
            result["plot"]["enabled"].as_ref().unwrap(),
            &vec![Value::Boolean(true)]
        );
    }

    #[test]
    fn test_strings_conversion() {
        let input = "series\n period: 1.5\n harmonics: 5\n";
        let result = parse_document_as_strings(input).unwrap();
        assert_eq!(
            result["series"]["period"].as_ref().unwrap(),
            &vec!["1.5".to_string()]
        );
        assert_eq!(
            result["series"]["harmonics"].as_ref().unwrap(),
            &vec!["5".to_string()]
        );
        assert!(!result.contains_key("logging"));
    }

    #[test]
    fn test_malformed_document() {
        let input = "series\n period: 2\n this line is not a pair";
        assert!(parse_document_as(input).is_err());
        assert!(parse_document_as_strings("").is_err());
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sawtooth.txt");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "// sawtooth wave").unwrap();
        writeln!(file, "series").unwrap();
        writeln!(file, "  period: 2*pi").unwrap();
        writeln!(file, "  harmonics: 15").unwrap();
        writeln!(file, "pieces").unwrap();
        writeln!(file, "  f1: t").unwrap();
        writeln!(file, "  limits1: -pi, pi").unwrap();
        writeln!(file, "plot").unwrap();
        writeln!(file, "  enabled: false").unwrap();

        let mut file = File::open(&file_path).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();

        let result = parse_document_as_strings(&contents).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(
            result["pieces"]["limits1"].as_ref().unwrap(),
            &vec!["-pi".to_string(), "pi".to_string()]
        );
        assert_eq!(
            result["plot"]["enabled"].as_ref().unwrap(),
            &vec!["false".to_string()]
        );
    }
}
