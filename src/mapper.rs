/// Stateless bidirectional transformer between two representations of the
/// same entity.
///
/// `parse_back` is the intended inverse of `transform`. Lossy pairs are
/// allowed; concrete mappers document their own lossiness.
pub trait DualMapper {
    type Source;
    type Target;

    fn transform(&self, value: Self::Source) -> Self::Target;

    fn parse_back(&self, value: Self::Target) -> Self::Source;

    /// Element-wise `transform`, order- and length-preserving.
    fn transform_all<I>(&self, values: I) -> Vec<Self::Target>
    where
        I: IntoIterator<Item = Self::Source>,
    {
        values.into_iter().map(|value| self.transform(value)).collect()
    }

    /// Element-wise `parse_back`, order- and length-preserving.
    fn parse_back_all<I>(&self, values: I) -> Vec<Self::Source>
    where
        I: IntoIterator<Item = Self::Target>,
    {
        values.into_iter().map(|value| self.parse_back(value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DigitsMapper;

    impl DualMapper for DigitsMapper {
        type Source = u32;
        type Target = String;

        fn transform(&self, value: u32) -> String {
            value.to_string()
        }

        fn parse_back(&self, value: String) -> u32 {
            value.parse().unwrap_or(0)
        }
    }

    #[test]
    fn test_scalar_round_trip() {
        let mapper = DigitsMapper;
        assert_eq!(mapper.transform(42), "42");
        assert_eq!(mapper.parse_back("42".into()), 42);
    }

    #[test]
    fn test_transform_all_preserves_order_and_length() {
        let mapper = DigitsMapper;
        assert_eq!(mapper.transform_all([3, 1, 2]), ["3", "1", "2"]);
        assert_eq!(mapper.transform_all(Vec::new()), Vec::<String>::new());
    }

    #[test]
    fn test_parse_back_all_preserves_order_and_length() {
        let mapper = DigitsMapper;
        let parsed = mapper.parse_back_all(vec!["10".to_string(), "20".to_string()]);
        assert_eq!(parsed, [10, 20]);
    }
}
