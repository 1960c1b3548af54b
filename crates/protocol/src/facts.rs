//! Parsing of `MLSD` listing lines (RFC 3659 section 7).
//!
//! Each line has the shape `fact=value;fact=value; name`. Fact names are
//! case-insensitive and unknown facts are ignored. The name is everything after
//! the first space and may itself contain spaces.

use crate::error::ParseError;

/// Value of the `type` fact.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryType {
    /// `type=file`
    File,
    /// `type=dir`
    Dir,
    /// `type=cdir`: the listed directory itself.
    CurrentDir,
    /// `type=pdir`: the parent of the listed directory.
    ParentDir,
    /// `type=OS.unix=slink...`: a symbolic link.
    Link,
    /// Any other server-specific type.
    Other(String),
}

impl EntryType {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("file") {
            Self::File
        } else if value.eq_ignore_ascii_case("dir") {
            Self::Dir
        } else if value.eq_ignore_ascii_case("cdir") {
            Self::CurrentDir
        } else if value.eq_ignore_ascii_case("pdir") {
            Self::ParentDir
        } else if value
            .get(..13)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("os.unix=slink"))
        {
            Self::Link
        } else {
            Self::Other(value.to_owned())
        }
    }

    /// Reports whether the entry names a child directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir)
    }

    /// Reports whether the entry describes the listed directory or its parent.
    #[must_use]
    pub const fn is_self_or_parent(&self) -> bool {
        matches!(self, Self::CurrentDir | Self::ParentDir)
    }
}

/// Facts reported for one listing entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facts {
    entry_type: Option<EntryType>,
    size: Option<u64>,
    modify: Option<String>,
    perm: Option<String>,
    unique: Option<String>,
}

impl Facts {
    /// Returns the `type` fact, if the server sent one.
    #[must_use]
    pub const fn entry_type(&self) -> Option<&EntryType> {
        self.entry_type.as_ref()
    }

    /// Returns the `size` fact in bytes.
    ///
    /// Servers omit the fact for directories and sometimes for files they
    /// cannot stat; an unparsable value is treated as absent.
    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Returns the raw `modify` timestamp (`YYYYMMDDHHMMSS[.sss]`).
    #[must_use]
    pub fn modify(&self) -> Option<&str> {
        self.modify.as_deref()
    }

    /// Returns the raw `perm` fact.
    #[must_use]
    pub fn perm(&self) -> Option<&str> {
        self.perm.as_deref()
    }

    /// Returns the raw `unique` fact.
    #[must_use]
    pub fn unique(&self) -> Option<&str> {
        self.unique.as_deref()
    }

    /// Reports whether the `type` fact marks a child directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.entry_type.as_ref().is_some_and(EntryType::is_dir)
    }
}

/// One entry of a structured listing.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MlsdEntry {
    name: String,
    facts: Facts,
}

impl MlsdEntry {
    /// Returns the entry name as sent by the server.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed facts.
    #[must_use]
    pub const fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Splits the entry into its name and facts.
    #[must_use]
    pub fn into_parts(self) -> (String, Facts) {
        (self.name, self.facts)
    }
}

/// Parses one line of `MLSD` output.
///
/// # Examples
///
/// ```
/// use protocol::{EntryType, parse_mlsd_line};
///
/// let entry = parse_mlsd_line("type=file;size=5;modify=20240101120000; a b.txt\r\n").unwrap();
/// assert_eq!(entry.name(), "a b.txt");
/// assert_eq!(entry.facts().entry_type(), Some(&EntryType::File));
/// assert_eq!(entry.facts().size(), Some(5));
/// ```
pub fn parse_mlsd_line(line: &str) -> Result<MlsdEntry, ParseError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    let malformed = || ParseError::MalformedFactsLine {
        input: trimmed.to_owned(),
    };

    let (fact_text, name) = trimmed.split_once(' ').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }

    let mut facts = Facts::default();
    for fact in fact_text.split(';').filter(|fact| !fact.is_empty()) {
        let Some((key, value)) = fact.split_once('=') else {
            continue;
        };
        if key.eq_ignore_ascii_case("type") {
            facts.entry_type = Some(EntryType::parse(value));
        } else if key.eq_ignore_ascii_case("size") {
            facts.size = value.parse().ok();
        } else if key.eq_ignore_ascii_case("modify") {
            facts.modify = Some(value.to_owned());
        } else if key.eq_ignore_ascii_case("perm") {
            facts.perm = Some(value.to_owned());
        } else if key.eq_ignore_ascii_case("unique") {
            facts.unique = Some(value.to_owned());
        }
    }

    Ok(MlsdEntry {
        name: name.to_owned(),
        facts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_entry_has_no_size() {
        let entry = parse_mlsd_line("Type=dir;Modify=20230102030405;Perm=flcdmpe; sub").unwrap();
        assert_eq!(entry.name(), "sub");
        assert!(entry.facts().is_dir());
        assert_eq!(entry.facts().size(), None);
        assert_eq!(entry.facts().modify(), Some("20230102030405"));
        assert_eq!(entry.facts().perm(), Some("flcdmpe"));
    }

    #[test]
    fn self_and_parent_entries_are_flagged() {
        let cdir = parse_mlsd_line("type=cdir;unique=AB; .").unwrap();
        let pdir = parse_mlsd_line("type=pdir; ..").unwrap();
        assert!(cdir.facts().entry_type().unwrap().is_self_or_parent());
        assert!(pdir.facts().entry_type().unwrap().is_self_or_parent());
        assert!(!cdir.facts().is_dir());
        assert_eq!(cdir.facts().unique(), Some("AB"));
    }

    #[test]
    fn unix_symlink_type_is_recognised() {
        let entry = parse_mlsd_line("type=OS.unix=slink:/etc/hosts; hosts").unwrap();
        assert_eq!(entry.facts().entry_type(), Some(&EntryType::Link));
    }

    #[test]
    fn unknown_type_is_preserved() {
        let entry = parse_mlsd_line("type=OS.unix=chr-1/3; null").unwrap();
        assert_eq!(
            entry.facts().entry_type(),
            Some(&EntryType::Other("OS.unix=chr-1/3".into()))
        );
    }

    #[test]
    fn unparsable_size_is_treated_as_absent() {
        let entry = parse_mlsd_line("type=file;size=huge; blob").unwrap();
        assert_eq!(entry.facts().size(), None);
    }

    #[test]
    fn line_without_facts_still_has_a_name() {
        let entry = parse_mlsd_line(" bare").unwrap();
        assert_eq!(entry.name(), "bare");
        assert_eq!(entry.facts(), &Facts::default());
    }

    #[test]
    fn line_without_separator_is_rejected() {
        let error = parse_mlsd_line("type=file;size=1;\r\n").unwrap_err();
        assert_eq!(error.input(), "type=file;size=1;");
        assert!(parse_mlsd_line("type=file; ").is_err());
    }

    #[test]
    fn into_parts_returns_owned_values() {
        let (name, facts) = parse_mlsd_line("type=file;size=3; c.txt")
            .unwrap()
            .into_parts();
        assert_eq!(name, "c.txt");
        assert_eq!(facts.size(), Some(3));
    }
}
