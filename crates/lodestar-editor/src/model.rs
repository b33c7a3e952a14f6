//! Editor records: raw blocks projected through their schema.

/// Entry value meaning "the key is present but has no value".
pub const EMPTY_MARKER: &str = "=";

/// One value of an option, with the nested child values that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditorEntry {
    pub value: String,
    /// Values of the option's child that appeared under this occurrence.
    pub child_values: Option<Vec<String>>,
}

impl EditorEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            child_values: None,
        }
    }

    pub fn with_children(value: impl Into<String>, children: Vec<String>) -> Self {
        Self {
            value: value.into(),
            child_values: Some(children),
        }
    }

    /// Build an entry from a file value; an empty value becomes
    /// [`EMPTY_MARKER`].
    pub fn from_raw(value: &str) -> Self {
        if value.is_empty() {
            Self::new(EMPTY_MARKER)
        } else {
            Self::new(value)
        }
    }

    /// The value as written to a file; [`EMPTY_MARKER`] becomes `""`.
    pub fn raw_value(&self) -> &str {
        if self.is_empty_marker() {
            ""
        } else {
            &self.value
        }
    }

    pub fn is_empty_marker(&self) -> bool {
        self.value == EMPTY_MARKER
    }

    /// Comma-separated parts of the value, trimmed.
    pub fn as_list(&self) -> Vec<&str> {
        let raw = self.raw_value();
        if raw.is_empty() {
            return Vec::new();
        }
        raw.split(',').map(str::trim).collect()
    }

    pub fn as_i32(&self) -> Option<i32> {
        let raw = self.raw_value().trim();
        // BINI stores some integers as floats ("3.000000").
        raw.parse().ok().or_else(|| {
            raw.parse::<f32>()
                .ok()
                .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f32 && *f <= i32::MAX as f32)
                .map(|f| f as i32)
        })
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.raw_value().trim().parse().ok()
    }

    /// `true`/`false`, `yes`/`no` or `1`/`0`, ignoring ASCII case.
    pub fn as_bool(&self) -> Option<bool> {
        let raw = self.raw_value().trim();
        if ["true", "yes", "1"].iter().any(|t| raw.eq_ignore_ascii_case(t)) {
            Some(true)
        } else if ["false", "no", "0"].iter().any(|f| raw.eq_ignore_ascii_case(f)) {
            Some(false)
        } else {
            None
        }
    }

    /// Three comma-separated floats.
    pub fn as_point(&self) -> Option<[f32; 3]> {
        match self.as_list()[..] {
            [x, y, z] => Some([x.parse().ok()?, y.parse().ok()?, z.parse().ok()?]),
            _ => None,
        }
    }
}

/// All values of one declared option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditorOption {
    pub name: String,
    pub schema_option_index: usize,
    /// Name of the nested child option, when the schema declares one.
    pub child_name: Option<String>,
    pub values: Vec<EditorEntry>,
}

impl EditorOption {
    pub fn new(name: impl Into<String>, schema_option_index: usize) -> Self {
        Self {
            name: name.into(),
            schema_option_index,
            child_name: None,
            values: Vec::new(),
        }
    }

    /// Whether the option is a placeholder without values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<&EditorEntry> {
        self.values.first()
    }
}

/// A block mapped through its schema: one option per declared schema
/// option, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditorRecord {
    pub name: String,
    pub schema_block_index: usize,
    pub options: Vec<EditorOption>,
    /// Index into `options` of the option that names this record.
    pub identifier_option_index: Option<usize>,
}

impl EditorRecord {
    pub fn new(name: impl Into<String>, schema_block_index: usize) -> Self {
        Self {
            name: name.into(),
            schema_block_index,
            options: Vec::new(),
            identifier_option_index: None,
        }
    }

    /// The identifier option's first value, e.g. a nickname.
    pub fn display_name(&self) -> Option<&str> {
        let entry = self.options.get(self.identifier_option_index?)?.first()?;
        (!entry.is_empty_marker()).then_some(entry.value.as_str())
    }

    /// Find an option by name, ignoring ASCII case.
    pub fn option(&self, name: &str) -> Option<&EditorOption> {
        self.options.iter().find(|o| o.name.eq_ignore_ascii_case(name))
    }

    pub fn option_mut(&mut self, name: &str) -> Option<&mut EditorOption> {
        self.options.iter_mut().find(|o| o.name.eq_ignore_ascii_case(name))
    }

    /// First value of an option.
    pub fn value(&self, name: &str) -> Option<&EditorEntry> {
        self.option(name)?.first()
    }

    /// Replace all values of an option with one value. Returns `false` if
    /// the record has no such option.
    pub fn set_single(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(option) = self.option_mut(name) else {
            return false;
        };
        let value = value.into();
        option.values = vec![EditorEntry::from_raw(&value)];
        true
    }

    /// Append a value to an option. Returns `false` if the record has no
    /// such option.
    pub fn push_value(&mut self, name: &str, entry: EditorEntry) -> bool {
        let Some(option) = self.option_mut(name) else {
            return false;
        };
        option.values.push(entry);
        true
    }
}
