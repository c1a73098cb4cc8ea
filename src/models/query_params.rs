//! Multi-valued query string parameters, order preserving
use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Decodes an urlencoded query string
    pub fn parse(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        Self { pairs }
    }

    /// Last value bound to `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().rev().find(|&&(ref key, _)| key == name).map(|&(_, ref value)| value.as_str())
    }

    /// All values bound to `name` in query order
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|&&(ref key, _)| key == name)
            .map(|&(_, ref value)| value.clone())
            .collect()
    }

    /// Removes `name` and returns its values, `None` when it was absent
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let values = self.get_all(name);
        if values.is_empty() && !self.contains(name) {
            return None;
        }
        self.pairs.retain(|&(ref key, _)| key != name);
        Some(values)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|&(ref key, _)| key == name)
    }

    /// Distinct parameter names in order of first appearance
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = vec![];
        for &(ref key, _) in &self.pairs {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
        names
    }

    /// Parses the last value of `name`, `None` when absent or malformed
    pub fn parse_value<T: ::std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.parse().ok())
    }

    /// Copy with `name` bound to the single `value`
    pub fn with(&self, name: &str, value: String) -> Self {
        let mut params = self.clone();
        params.remove(name);
        params.pairs.push((name.to_string(), value));
        params
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_params_in_order() {
        let params = QueryParams::parse("color=red&color=blue&text=red+sedan&min_mileage=1000");
        assert_eq!(params.get_all("color"), vec!["red", "blue"]);
        assert_eq!(params.get("color"), Some("blue"));
        assert_eq!(params.get("text"), Some("red sedan"));
        assert_eq!(params.names(), vec!["color", "text", "min_mileage"]);
        assert_eq!(params.parse_value::<i64>("min_mileage"), Some(1000));
    }

    #[test]
    fn remove_distinguishes_absent_from_empty() {
        let mut params = QueryParams::parse("text=&cat=CAR");
        assert_eq!(params.remove("text"), Some(vec!["".to_string()]));
        assert_eq!(params.remove("ex_cats"), None);
        assert!(!params.contains("text"));
        assert!(params.contains("cat"));
    }

    #[test]
    fn with_replaces_values() {
        let params = QueryParams::parse("offset=5&cat=CAR&offset=10");
        let next = params.with("offset", "15".to_string());
        assert_eq!(next.to_query_string(), "cat=CAR&offset=15");
    }
}
