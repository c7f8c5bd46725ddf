use hyper::header::AsHeaderName;
use hyper::Response;

pub trait ResponseExt {
    fn get_header<K>(&self, header: K) -> Option<String>
    where
        K: AsHeaderName;
}

impl<B> ResponseExt for Response<B> {
    fn get_header<K>(&self, header: K) -> Option<String>
    where
        K: AsHeaderName,
    {
        self.headers()
            .get(header)
            .and_then(|header| header.to_str().ok())
            .map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};

    #[test]
    fn test_get_header() {
        let res = Response::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(())
            .unwrap();
        assert_eq!(
            res.get_header(CONTENT_TYPE),
            Some("application/json".to_string())
        );
        assert_eq!(res.get_header(CONTENT_LENGTH), None);
    }
}
