//! Parser for `go.mod` manifests.
//!
//! Only the directives that shape the dependency tree are kept:
//!
//! ```text
//! module example.com/root
//!
//! require example.com/leaf v0.9.0
//! require (
//!     example.com/other v1.2.3 // indirect
//! )
//!
//! replace example.com/old => example.com/new v1.0.0
//! ```
//!
//! `go`, `toolchain`, `exclude`, `retract`, `godebug`, `tool` and `ignore` are
//! accepted and skipped.

use modtree_util::errors::{ModtreeError, ModtreeResult};

/// A parsed `go.mod` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModFile {
    /// Declared module path; empty when the file has no `module` directive.
    pub module: String,

    /// Value of the `go` directive, if present.
    pub go: Option<String>,

    /// Requirements in declaration order.
    pub requires: Vec<Require>,

    /// Replacement directives in declaration order.
    pub replaces: Vec<Replace>,
}

/// A single `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    pub path: String,
    pub version: String,
    /// Marked `// indirect`.
    pub indirect: bool,
}

/// A single `replace` entry: `old [old-version] => new [new-version]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Require,
    Replace,
    Ignored,
}

impl ModFile {
    /// Parse raw manifest bytes.
    pub fn parse(data: &[u8]) -> ModtreeResult<Self> {
        let content = std::str::from_utf8(data).map_err(|e| ModtreeError::Parse {
            message: format!("go.mod is not valid UTF-8: {e}"),
        })?;
        Self::parse_str(content)
    }

    /// Parse manifest text.
    pub fn parse_str(content: &str) -> ModtreeResult<Self> {
        let mut file = ModFile::default();
        let mut seen_module = false;
        let mut block: Option<(Directive, usize)> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_num = idx + 1;
            let (code, comment) = split_comment(raw);
            let line = code.trim();
            if line.is_empty() {
                continue;
            }
            let indirect = comment.is_some_and(|c| c.trim_start().starts_with("indirect"));

            if let Some((directive, _)) = block {
                if line == ")" {
                    block = None;
                    continue;
                }
                file.parse_entry(directive, line, indirect, line_num)?;
                continue;
            }

            let (keyword, rest) = match line.split_once(char::is_whitespace) {
                Some((k, r)) => (k, r.trim()),
                None => (line, ""),
            };

            let directive = match keyword {
                "module" => {
                    if seen_module {
                        return Err(parse_error(line_num, "repeated module directive"));
                    }
                    let path = single_token(rest, line_num, "module")?;
                    file.module = unquote(path).to_string();
                    seen_module = true;
                    continue;
                }
                "go" => {
                    file.go = Some(single_token(rest, line_num, "go")?.to_string());
                    continue;
                }
                "require" => Directive::Require,
                "replace" => Directive::Replace,
                "toolchain" | "exclude" | "retract" | "godebug" | "tool" | "ignore" => {
                    Directive::Ignored
                }
                other => {
                    return Err(parse_error(line_num, &format!("unknown directive: {other}")));
                }
            };

            if rest == "(" {
                block = Some((directive, line_num));
                continue;
            }
            if rest.is_empty() {
                return Err(parse_error(line_num, &format!("{keyword} directive needs arguments")));
            }
            file.parse_entry(directive, rest, indirect, line_num)?;
        }

        if let Some((_, opened_at)) = block {
            return Err(parse_error(opened_at, "unterminated block"));
        }

        Ok(file)
    }

    fn parse_entry(
        &mut self,
        directive: Directive,
        entry: &str,
        indirect: bool,
        line_num: usize,
    ) -> ModtreeResult<()> {
        match directive {
            Directive::Require => {
                let parts: Vec<&str> = entry.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(parse_error(
                        line_num,
                        &format!("usage: require module/path v1.2.3, got: {entry}"),
                    ));
                }
                self.requires.push(Require {
                    path: unquote(parts[0]).to_string(),
                    version: unquote(parts[1]).to_string(),
                    indirect,
                });
            }
            Directive::Replace => {
                let Some((old, new)) = entry.split_once("=>") else {
                    return Err(parse_error(line_num, "replace is missing =>"));
                };
                let (old_path, old_version) = path_and_version(old, line_num)?;
                let (new_path, new_version) = path_and_version(new, line_num)?;
                self.replaces.push(Replace {
                    old_path,
                    old_version,
                    new_path,
                    new_version,
                });
            }
            Directive::Ignored => {}
        }
        Ok(())
    }

    /// First replacement whose old path matches `path`. Old versions are not
    /// considered.
    pub fn replacement_for(&self, path: &str) -> Option<&Replace> {
        self.replaces.iter().find(|r| r.old_path == path)
    }
}

/// Split a line into code and the text after `//`, if any.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
        None => (line, None),
    }
}

fn single_token<'a>(rest: &'a str, line_num: usize, keyword: &str) -> ModtreeResult<&'a str> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(parse_error(
            line_num,
            &format!("usage: {keyword} <value>, got: {keyword} {rest}"),
        )),
    }
}

fn path_and_version(side: &str, line_num: usize) -> ModtreeResult<(String, Option<String>)> {
    let parts: Vec<&str> = side.split_whitespace().collect();
    match parts.as_slice() {
        [path] => Ok((unquote(path).to_string(), None)),
        [path, version] => Ok((unquote(path).to_string(), Some(unquote(version).to_string()))),
        _ => Err(parse_error(
            line_num,
            &format!("usage: replace old [v] => new [v], got: {}", side.trim()),
        )),
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| token.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
        .unwrap_or(token)
}

fn parse_error(line_num: usize, message: &str) -> ModtreeError {
    ModtreeError::Parse {
        message: format!("go.mod:{line_num}: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETCD_LIKE: &str = r#"module go.etcd.io/etcd/v3

go 1.23

toolchain go1.23.4

replace (
	go.etcd.io/etcd/api/v3 => ./api
	go.etcd.io/etcd/client/v3 v3.6.0 => go.etcd.io/etcd/client/v3 v3.6.1
)

require (
	github.com/bgentry/speakeasy v0.2.0
	github.com/dustin/go-humanize v1.0.1 // indirect
	"go.uber.org/zap" v1.27.0
)

require golang.org/x/net v0.33.0

exclude (
	google.golang.org/grpc v1.0.0
)

retract v3.5.99 // published by mistake
"#;

    #[test]
    fn parse_full_manifest() {
        let f = ModFile::parse_str(ETCD_LIKE).unwrap();
        assert_eq!(f.module, "go.etcd.io/etcd/v3");
        assert_eq!(f.go.as_deref(), Some("1.23"));
        assert_eq!(f.requires.len(), 4);
        assert_eq!(f.requires[0].path, "github.com/bgentry/speakeasy");
        assert!(!f.requires[0].indirect);
        assert!(f.requires[1].indirect);
        assert_eq!(f.requires[2].path, "go.uber.org/zap");
        assert_eq!(f.requires[3].version, "v0.33.0");
    }

    #[test]
    fn parse_replace_forms() {
        let f = ModFile::parse_str(ETCD_LIKE).unwrap();
        assert_eq!(f.replaces.len(), 2);
        assert_eq!(f.replaces[0].new_path, "./api");
        assert_eq!(f.replaces[0].new_version, None);
        assert_eq!(f.replaces[1].old_version.as_deref(), Some("v3.6.0"));
        assert_eq!(f.replaces[1].new_version.as_deref(), Some("v3.6.1"));
    }

    #[test]
    fn replacement_matches_by_path_first_wins() {
        let f = ModFile::parse_str(
            "module m\nreplace a v1 => b v2\nreplace a => c v3\n",
        )
        .unwrap();
        let r = f.replacement_for("a").unwrap();
        assert_eq!(r.new_path, "b");
        assert!(f.replacement_for("z").is_none());
    }

    #[test]
    fn missing_module_is_empty_path() {
        let f = ModFile::parse_str("require a v1\n").unwrap();
        assert!(f.module.is_empty());
        assert_eq!(f.requires.len(), 1);
    }

    #[test]
    fn duplicate_module_rejected() {
        let err = ModFile::parse_str("module a\nmodule b\n").unwrap_err();
        assert!(err.to_string().contains("go.mod:2"), "got: {err}");
    }

    #[test]
    fn unknown_directive_rejected() {
        let err = ModFile::parse_str("module a\nfrobnicate x\n").unwrap_err();
        assert!(matches!(err, ModtreeError::Parse { .. }));
    }

    #[test]
    fn unterminated_block_rejected() {
        let err = ModFile::parse_str("module a\nrequire (\n\tb v1\n").unwrap_err();
        assert!(err.to_string().contains("go.mod:2: unterminated block"), "got: {err}");
    }

    #[test]
    fn bad_require_arity_rejected() {
        assert!(ModFile::parse_str("module a\nrequire b\n").is_err());
        assert!(ModFile::parse_str("module a\nrequire b v1 extra\n").is_err());
    }

    #[test]
    fn replace_without_arrow_rejected() {
        assert!(ModFile::parse_str("module a\nreplace b c\n").is_err());
    }

    #[test]
    fn html_is_not_a_manifest() {
        assert!(ModFile::parse_str("<!DOCTYPE html>\n<html></html>\n").is_err());
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert!(ModFile::parse(&[0x6d, 0xff, 0xfe]).is_err());
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let f = ModFile::parse_str("// header\n\nmodule a // trailing\n").unwrap();
        assert_eq!(f.module, "a");
    }
}
