//! Fixed-width field layouts of device replies
//!
//! Each reply kind is described as a table of `(name, offset, width)` slices
//! over the reply body. Fields are grouped by the minimum body length that
//! enables them, so a short reply decodes the groups it fully carries and
//! leaves the rest unset.

/// One fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Offset one past the last char of the field
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// Fields decoded together once the body reaches `min_len`
#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub min_len: usize,
    pub fields: &'static [Field],
}

/// Layout of one reply kind
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Reply kind, used in error messages and logs
    pub kind: &'static str,
    pub groups: &'static [FieldGroup],
}

impl Layout {
    /// Slice every field the body is long enough to carry
    pub fn extract<'a>(&self, body: &'a str) -> Fields<'a> {
        let values = self
            .groups
            .iter()
            .filter(|group| body.len() >= group.min_len)
            .flat_map(|group| group.fields.iter())
            .filter_map(|field| {
                body.get(field.offset..field.end())
                    .map(|value| (field.name, value))
            })
            .collect();

        Fields { values }
    }

    /// Iterate over every field of the layout
    pub fn fields(&self) -> impl Iterator<Item = &'static Field> + '_ {
        self.groups.iter().flat_map(|group| group.fields.iter())
    }

    /// Shortest body that decodes every field
    pub fn full_len(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.min_len)
            .max()
            .unwrap_or(0)
    }
}

/// Field values sliced out of a body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields<'a> {
    values: Vec<(&'static str, &'a str)>,
}

impl<'a> Fields<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// Owned copy of a field value
    pub fn owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Supply record (`&A`), body without `(`, checksum and `)`
pub const SUPPLY: Layout = Layout {
    kind: "supply",
    groups: &[
        FieldGroup {
            min_len: 24,
            fields: &[
                Field::new("total_to_pay", 0, 6),
                Field::new("volume", 6, 6),
                Field::new("price", 12, 4),
                Field::new("comma_code", 16, 2),
                Field::new("supply_time", 18, 4),
                Field::new("nozzle", 22, 2),
            ],
        },
        FieldGroup {
            min_len: 30,
            fields: &[
                Field::new("day", 24, 2),
                Field::new("hour", 26, 2),
                Field::new("minute", 28, 2),
            ],
        },
        FieldGroup {
            min_len: 52,
            fields: &[
                Field::new("month", 30, 2),
                Field::new("record", 32, 4),
                Field::new("final_total", 36, 10),
                Field::new("status", 46, 2),
            ],
        },
    ],
};

/// Identified supply record, body after the extra header byte
pub const SUPPLY_IDENTIFIED: Layout = Layout {
    kind: "identified supply",
    groups: &[FieldGroup {
        min_len: 70,
        fields: &[
            Field::new("total", 0, 6),
            Field::new("volume", 6, 6),
            Field::new("price", 12, 4),
            Field::new("nozzle", 22, 2),
            Field::new("identifier", 50, 16),
        ],
    }],
};

/// One 8-char visualization window
pub const VISUALIZATION_ENTRY: Layout = Layout {
    kind: "visualization",
    groups: &[FieldGroup {
        min_len: 8,
        fields: &[Field::new("nozzle", 0, 2), Field::new("value", 2, 6)],
    }],
};

/// Fixed head of a total reading; the value runs to the end of the body
pub const TOTAL: Layout = Layout {
    kind: "total",
    groups: &[FieldGroup {
        min_len: 3,
        fields: &[Field::new("mode", 0, 1), Field::new("nozzle", 1, 2)],
    }],
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL: [Layout; 4] = [SUPPLY, SUPPLY_IDENTIFIED, VISUALIZATION_ENTRY, TOTAL];

    #[test]
    fn test_fields_fit_their_group() {
        for layout in ALL {
            for group in layout.groups {
                for field in group.fields {
                    assert!(
                        field.end() <= group.min_len,
                        "{}.{} ends at {} past min_len {}",
                        layout.kind,
                        field.name,
                        field.end(),
                        group.min_len
                    );
                }
            }
        }
    }

    #[test]
    fn test_fields_do_not_overlap() {
        for layout in ALL {
            let mut fields: Vec<&Field> = layout.fields().collect();
            fields.sort_by_key(|field| field.offset);
            for pair in fields.windows(2) {
                assert!(
                    pair[0].end() <= pair[1].offset,
                    "{}.{} overlaps {}",
                    layout.kind,
                    pair[0].name,
                    pair[1].name
                );
            }
        }
    }

    #[test]
    fn test_supply_layout_shape() {
        assert_eq!(SUPPLY.fields().count(), 13);
        assert_eq!(SUPPLY.full_len(), 52);
        assert_eq!(SUPPLY_IDENTIFIED.full_len(), 70);
    }

    #[test]
    fn test_extract_by_group() {
        let body = "0123456789";
        let fields = TOTAL.extract(body);
        assert_eq!(fields.get("mode"), Some("0"));
        assert_eq!(fields.get("nozzle"), Some("12"));
        assert_eq!(fields.len(), 2);

        assert!(TOTAL.extract("01").is_empty());
    }

    #[test]
    fn test_extract_partial_supply() {
        let body = "a".repeat(29);
        let fields = SUPPLY.extract(&body);
        assert_eq!(fields.len(), 6);
        assert_eq!(fields.get("day"), None);
    }
}
