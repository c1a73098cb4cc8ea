//! Regex based route parser
use regex::Regex;

type ParamsConverter<R> = Fn(Vec<&str>) -> Option<R> + Send + Sync;

/// Matches a path against registered patterns in registration order
pub struct RouteParser<R> {
    routes: Vec<(Regex, Box<ParamsConverter<R>>)>,
}

impl<R> Default for RouteParser<R> {
    fn default() -> Self {
        Self { routes: vec![] }
    }
}

impl<R> RouteParser<R> {
    /// Adds a route without captured params
    pub fn add_route<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        self.add_route_with_params(pattern, move |_| Some(f()));
    }

    /// Adds a route whose regex captures are handed to `converter`
    pub fn add_route_with_params<F>(&mut self, pattern: &str, converter: F)
    where
        F: Fn(Vec<&str>) -> Option<R> + Send + Sync + 'static,
    {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid route pattern {}: {}", pattern, e));
        self.routes.push((regex, Box::new(converter)));
    }

    /// First route matching `path`, `None` when nothing matches
    pub fn test(&self, path: &str) -> Option<R> {
        self.routes.iter().filter_map(|&(ref regex, ref converter)| {
            regex.captures(path).and_then(|captures| {
                let params = captures.iter().skip(1).filter_map(|capture| capture.map(|m| m.as_str())).collect();
                converter(params)
            })
        }).next()
    }
}
