use super::ImportError;

/// Параметры разбора входного файла
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Первая строка содержит имена колонок
    pub has_header: bool,
    /// Разделитель; `None` = определить по первой строке
    pub delimiter: Option<u8>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: None,
        }
    }
}

/// Одна непустая строка данных: колонка -> значение, в порядке колонок файла.
/// Значения не приводятся к типам; отсутствующая в короткой строке колонка просто не попадает в `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    position: usize,
    fields: Vec<(String, String)>,
}

impl ImportRow {
    pub fn new(position: usize, fields: Vec<(String, String)>) -> Self {
        Self { position, fields }
    }

    /// Номер строки данных, начиная с 1
    pub fn position(&self) -> usize {
        self.position
    }

    /// Сырое значение колонки (первое вхождение при дублях заголовка)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Разобрать файл целиком. Либо все строки, либо одна фатальная ошибка.
pub fn parse_rows(content: &[u8], options: &ParseOptions) -> Result<Vec<ImportRow>, ImportError> {
    let text = std::str::from_utf8(content)?;
    // Strip UTF-8 BOM if present (Excel exports)
    let text = text.trim_start_matches('\u{FEFF}');

    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(text));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        if options.has_header && headers.is_none() {
            headers = Some(record.iter().map(normalize_header).collect());
            continue;
        }

        let fields = record
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                let name = match &headers {
                    Some(h) => h.get(idx).filter(|name| !name.is_empty())?.clone(),
                    None => format!("col{}", idx + 1),
                };
                Some((name, value.to_string()))
            })
            .collect();

        rows.push(ImportRow::new(rows.len() + 1, fields));
    }

    Ok(rows)
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Выбрать разделитель по первой непустой строке: `,` `;` или табуляция
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut in_quotes = false;
    let (mut commas, mut semicolons, mut tabs) = (0usize, 0usize, 0usize);
    for ch in first_line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => commas += 1,
            ';' if !in_quotes => semicolons += 1,
            '\t' if !in_quotes => tabs += 1,
            _ => {}
        }
    }

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas && tabs > semicolons {
        b'\t'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<ImportRow> {
        parse_rows(text.as_bytes(), &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_header_names_are_normalized_and_rows_keep_order() {
        let rows = parse(" Titulo ,DATA,tipo\nMentoria 1,2024-05-10,mentoria\nLive,2024-05-11,live\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position(), 1);
        assert_eq!(rows[0].get("titulo"), Some("Mentoria 1"));
        assert_eq!(rows[0].get("data"), Some("2024-05-10"));
        assert_eq!(rows[1].position(), 2);
        assert_eq!(rows[1].get("tipo"), Some("live"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = parse("titulo,tipo\n\nA,live\n   \n , \nB,workshop\n");
        let titles: Vec<_> = rows.iter().map(|r| r.get("titulo").unwrap()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(rows[1].position(), 2);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        assert!(parse("titulo,data,tipo\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_short_lines_leave_fields_absent() {
        let rows = parse("titulo,data,tipo,link\nSó título\n");
        assert_eq!(rows[0].get("titulo"), Some("Só título"));
        assert_eq!(rows[0].get("tipo"), None);
        assert_eq!(rows[0].fields().len(), 1);
    }

    #[test]
    fn test_semicolon_delimiter_is_detected() {
        let rows = parse("titulo;autor\n\"Rápido e devagar; duas formas\";Daniel Kahneman\n");
        assert_eq!(rows[0].get("titulo"), Some("Rápido e devagar; duas formas"));
        assert_eq!(rows[0].get("autor"), Some("Daniel Kahneman"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let rows = parse("\u{FEFF}titulo,tipo\nA,live\n");
        assert_eq!(rows[0].get("titulo"), Some("A"));
    }

    #[test]
    fn test_without_header_columns_are_positional() {
        let options = ParseOptions {
            has_header: false,
            delimiter: Some(b','),
        };
        let rows = parse_rows(b"A,live\nB,workshop\n", &options).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("col1"), Some("A"));
        assert_eq!(rows[1].get("col2"), Some("workshop"));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let err = parse_rows(b"titulo\n\xff\xfe\xfa\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::Encoding(_)));
    }
}
