//! 输出解析函数

use super::types::{Origin, PackageDetail, PackageRecord};

/// 清理终端输出中的 ANSI 转义序列和特殊字符
pub fn clean_terminal_output(input: &str) -> String {
    let mut result = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\r' => {}
            c if c.is_control() && c != '\t' => {}
            _ => result.push(c),
        }
    }

    result
}

/// `yay -Ss` / `pacman -Ss` 搜索输出解析器
///
/// 输出格式为每个包一行 header（无缩进），紧跟一行缩进的描述：
///
/// ```text
/// extra/bar 2.3.4-1 (1.2 MiB 4.0 MiB) (Installed)
///     A sample official package
/// aur/foo 1.0-1 (+12 0.50)
///     A sample foreign package
/// ```
#[derive(Debug, Clone)]
pub struct SearchParser {
    foreign_markers: Vec<String>,
}

impl Default for SearchParser {
    fn default() -> Self {
        Self::new(vec!["aur".to_string()])
    }
}

impl SearchParser {
    pub fn new(foreign_markers: Vec<String>) -> Self {
        Self { foreign_markers }
    }

    /// 解析搜索输出，保持输入顺序；无法识别的行直接跳过
    pub fn parse(&self, lines: &[String]) -> Vec<PackageRecord> {
        let mut records = Vec::new();
        let mut current: Option<PackageRecord> = None;

        for raw in lines {
            let line = clean_terminal_output(raw);
            if line.trim().is_empty() {
                continue;
            }

            // 缩进行只可能是上一个 header 的描述
            if line.starts_with(char::is_whitespace) {
                match current.as_mut() {
                    Some(record) => append_description(record, line.trim()),
                    None => log::debug!("跳过无归属的描述行: {}", line.trim()),
                }
                continue;
            }

            if let Some(record) = current.take() {
                records.push(record);
            }
            current = self.parse_header(&line);
            if current.is_none() {
                log::debug!("无法识别的搜索输出行: {}", line);
            }
        }

        if let Some(record) = current {
            records.push(record);
        }

        records
    }

    fn parse_header(&self, line: &str) -> Option<PackageRecord> {
        let (repo, rest) = line.trim().split_once('/')?;
        if repo.is_empty()
            || repo.contains(char::is_whitespace)
            || rest.starts_with(char::is_whitespace)
        {
            return None;
        }

        let (name, after_name) = split_token(rest);
        if name.is_empty() {
            return None;
        }
        let (version, status) = split_token(after_name);

        let lowered = status.to_lowercase();
        let installed = lowered.contains("(installed")
            || lowered.contains("[installed")
            || status.contains("[已安装");

        let foreign = self.is_foreign_marker(repo) || has_vote_group(status);
        let (repository, origin) = if foreign {
            let marker = self
                .foreign_markers
                .first()
                .map(String::as_str)
                .unwrap_or(repo);
            (marker.to_string(), Origin::Foreign)
        } else {
            (repo.to_string(), Origin::Official)
        };

        Some(PackageRecord {
            repository,
            name: name.to_string(),
            version: version.to_string(),
            status: status.to_string(),
            description: None,
            installed,
            origin,
        })
    }

    fn is_foreign_marker(&self, repo: &str) -> bool {
        self.foreign_markers
            .iter()
            .any(|m| m.eq_ignore_ascii_case(repo))
    }
}

/// 切出第一个空白分隔的 token，返回 (token, 去掉首尾空白的剩余部分)
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, ""),
    }
}

/// AUR 包在版本号后带有 `(+票数 热度)` 分组
fn has_vote_group(status: &str) -> bool {
    status.split('(').skip(1).any(|group| {
        let inner = group.split(')').next().unwrap_or_default();
        let mut tokens = inner.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(votes), Some(popularity), None) => {
                votes
                    .strip_prefix('+')
                    .is_some_and(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
                    && popularity.parse::<f64>().is_ok()
            }
            _ => false,
        }
    })
}

fn append_description(record: &mut PackageRecord, text: &str) {
    match record.description.as_mut() {
        Some(desc) => {
            desc.push(' ');
            desc.push_str(text);
        }
        None => record.description = Some(text.to_string()),
    }
}

/// 解析 `-Si` / `-Qi` 的详情输出
pub fn parse_package_detail(lines: &[String]) -> PackageDetail {
    let mut fields: Vec<(String, String)> = Vec::new();

    for raw in lines {
        let line = clean_terminal_output(raw);
        if line.trim().is_empty() {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    fields.push((key.to_string(), value.trim().to_string()));
                    continue;
                }
            }
        } else if let Some((_, value)) = fields.last_mut() {
            // 折行的值（如 Optional Deps）
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.trim());
            continue;
        }

        log::debug!("跳过无法识别的详情行: {}", line);
    }

    PackageDetail { fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_official_header_with_installed_marker() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "extra/bar 2.3.4 (Installed)",
            "    A sample official package",
        ]));

        assert_eq!(records.len(), 1);
        let bar = &records[0];
        assert_eq!(bar.repository, "extra");
        assert_eq!(bar.name, "bar");
        assert_eq!(bar.version, "2.3.4");
        assert_eq!(bar.status, "(Installed)");
        assert!(bar.installed);
        assert_eq!(bar.origin, Origin::Official);
        assert_eq!(bar.description.as_deref(), Some("A sample official package"));
    }

    #[test]
    fn test_foreign_marker_consumes_description() {
        let parser = SearchParser::new(vec!["community".to_string()]);
        let records = parser.parse(&lines(&["community/foo 1.0-1", "    A sample foreign package"]));

        assert_eq!(records.len(), 1);
        let foo = &records[0];
        assert_eq!(foo.repository, "community");
        assert_eq!(foo.name, "foo");
        assert_eq!(foo.version, "1.0-1");
        assert!(foo.is_foreign());
        assert!(!foo.installed);
        assert_eq!(foo.description.as_deref(), Some("A sample foreign package"));
    }

    #[test]
    fn test_vote_group_marks_foreign_without_marker_match() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "custom/yay-bin 12.4.2-1 (+1024 12.34) (Installed: 12.4.1-1)",
            "    Yet another yogurt. Pacman wrapper and AUR helper written in go.",
        ]));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].repository, "aur");
        assert_eq!(records[0].origin, Origin::Foreign);
        assert_eq!(records[0].version, "12.4.2-1");
        assert!(records[0].installed);
    }

    #[test]
    fn test_size_group_is_not_a_vote_group() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&["extra/vim 9.1-1 (1.9 MiB 4.5 MiB)", "    Vi Improved"]));

        assert_eq!(records[0].origin, Origin::Official);
        assert_eq!(records[0].repository, "extra");
    }

    #[test]
    fn test_header_on_last_line_has_no_description() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&["core/linux 6.10.1-1"]));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "linux");
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_blank_lines_do_not_shift_pairing() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "extra/a 1-1",
            "",
            "    first",
            "   ",
            "extra/b 2-1",
            "\t",
            "    second",
        ]));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description.as_deref(), Some("first"));
        assert_eq!(records[1].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_consecutive_headers_without_descriptions() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&["extra/a 1-1", "extra/b 2-1", "    only b"]));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, None);
        assert_eq!(records[1].description.as_deref(), Some("only b"));
    }

    #[test]
    fn test_official_and_foreign_records_interleave_in_input_order() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "extra/one 1-1",
            "    one",
            "aur/two 2-1 (+3 0.01)",
            "    two",
            "core/three 3-1",
            "    three",
        ]));

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["one", "two", "three"]);
        assert_eq!(records[1].origin, Origin::Foreign);
    }

    #[test]
    fn test_unparseable_lines_are_dropped_with_their_descriptions() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "    orphan description",
            ":: Synchronizing package databases...",
            "    belongs to the noise line",
            "/nameless 1.0",
            "extra/ 1.0",
            "extra/ok 1.0",
            "    fine",
        ]));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok");
        assert_eq!(records[0].description.as_deref(), Some("fine"));
    }

    #[test]
    fn test_record_count_bounded_by_header_lines() {
        let parser = SearchParser::default();
        let input = lines(&[
            "extra/a 1",
            "    a",
            "garbage",
            "",
            "aur/b 2 (+1 0.00)",
            "    b",
            "    more b",
            "no-slash here",
        ]);
        let headers = input
            .iter()
            .filter(|l| !l.trim().is_empty() && !l.starts_with(char::is_whitespace))
            .count();

        let records = parser.parse(&input);
        assert!(records.len() <= headers);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].description.as_deref(), Some("b more b"));
        for r in &records {
            assert!(!r.name.is_empty());
            assert!(!r.repository.is_empty());
        }
    }

    #[test]
    fn test_ansi_colored_output_is_cleaned() {
        let parser = SearchParser::default();
        let records = parser.parse(&lines(&[
            "\x1b[1m\x1b[35mextra\x1b[0m/\x1b[1mripgrep\x1b[0m \x1b[32m14.1.0-1\x1b[0m",
            "\x1b[0m    A search tool",
        ]));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].repository, "extra");
        assert_eq!(records[0].name, "ripgrep");
        assert_eq!(records[0].version, "14.1.0-1");
        assert_eq!(records[0].description.as_deref(), Some("A search tool"));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(SearchParser::default().parse(&[]).is_empty());
    }

    #[test]
    fn test_parse_package_detail_keeps_order_and_joins_wrapped_values() {
        let detail = parse_package_detail(&lines(&[
            "Repository      : extra",
            "Name            : ripgrep",
            "URL             : https://github.com/BurntSushi/ripgrep",
            "Optional Deps   : bash-completion: completions",
            "                  zsh: completions",
            "",
            "not a field",
        ]));

        let keys: Vec<&str> = detail.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Repository", "Name", "URL", "Optional Deps"]);
        assert_eq!(detail.get("url"), Some("https://github.com/BurntSushi/ripgrep"));
        assert_eq!(
            detail.get("Optional Deps"),
            Some("bash-completion: completions zsh: completions")
        );
    }

    #[test]
    fn test_clean_terminal_output_strips_escapes() {
        assert_eq!(clean_terminal_output("\x1b[1;31mred\x1b[0m\r"), "red");
    }
}
