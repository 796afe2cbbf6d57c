use framefield_protocol::FieldRecord;

/// Sorts records ascending by field name, compared bytewise.
///
/// The sort is stable: records sharing a name keep their relative
/// arrival order, which is what makes the final ordering reproducible
/// when frames report colliding names.
pub fn sort_fields(fields: &mut [FieldRecord]) {
    fields.sort_by(|a, b| a.key().as_bytes().cmp(b.key().as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sorts_ascending_by_name() {
        let mut fields = vec![
            FieldRecord::new("zip", "Postal code"),
            FieldRecord::new("email", "Email"),
            FieldRecord::new("name", "Full name"),
        ];
        sort_fields(&mut fields);
        let names: Vec<&str> = fields.iter().map(FieldRecord::key).collect();
        assert_eq!(names, vec!["email", "name", "zip"]);
    }

    #[test]
    fn equal_names_keep_arrival_order() {
        let mut fields = vec![
            FieldRecord::new("name", "first arrival"),
            FieldRecord::new("address", "Address"),
            FieldRecord::new("name", "second arrival"),
            FieldRecord::new("name", "third arrival"),
        ];
        sort_fields(&mut fields);
        assert_eq!(
            fields,
            vec![
                FieldRecord::new("address", "Address"),
                FieldRecord::new("name", "first arrival"),
                FieldRecord::new("name", "second arrival"),
                FieldRecord::new("name", "third arrival"),
            ]
        );
    }

    #[test]
    fn ordering_is_bytewise_not_case_folded() {
        let mut fields = vec![
            FieldRecord::new("a", "lower"),
            FieldRecord::new("B", "upper"),
        ];
        sort_fields(&mut fields);
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(fields[0].key(), "B");
        assert_eq!(fields[1].key(), "a");
    }
}
