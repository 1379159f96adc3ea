use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http::HeaderMap;
use http::header::SET_COOKIE;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, PartialEq)]
struct StoredCookie {
    value: String,
    expires: Option<SystemTime>,
}

impl StoredCookie {
    fn is_live(&self, now: SystemTime) -> bool {
        self.expires.is_none_or(|at| at > now)
    }
}

/// One parsed `Set-Cookie` line; only the attributes that decide lifetime
/// are kept.
#[derive(Debug, PartialEq)]
struct SetCookie {
    name: String,
    cookie: StoredCookie,
}

impl SetCookie {
    fn parse(raw: &str, now: SystemTime) -> Option<Self> {
        let mut fields = raw.split(';');
        let (name, value) = fields.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut max_age = None;
        let mut expires = None;
        for field in fields {
            let (key, val) = field.split_once('=').unwrap_or((field, ""));
            let key = key.trim();
            if key.eq_ignore_ascii_case("max-age") {
                max_age = val.trim().parse::<i64>().ok();
            } else if key.eq_ignore_ascii_case("expires") {
                expires = parse_http_date(val.trim());
            }
        }

        // Max-Age wins over Expires; zero or negative expires at once.
        let expires = match max_age {
            Some(secs) if secs <= 0 => Some(UNIX_EPOCH),
            Some(secs) => now.checked_add(Duration::from_secs(secs.unsigned_abs())),
            None => expires,
        };
        Some(Self {
            name: name.to_owned(),
            cookie: StoredCookie {
                value: value.trim().to_owned(),
                expires,
            },
        })
    }
}

/// Cookies per host, then per name.
#[derive(Debug, Default)]
pub(crate) struct CookieJar {
    hosts: HashMap<String, BTreeMap<String, StoredCookie>>,
}

impl CookieJar {
    pub(crate) fn clear(&mut self) {
        self.hosts.clear();
    }

    /// Applies every `Set-Cookie` header of a response from `host`.
    /// A cookie whose lifetime already ended removes the stored one.
    pub(crate) fn store(&mut self, host: &str, headers: &HeaderMap, now: SystemTime) {
        for header in headers.get_all(SET_COOKIE) {
            let Some(parsed) = header.to_str().ok().and_then(|raw| SetCookie::parse(raw, now))
            else {
                continue;
            };
            let cookies = self.hosts.entry(host.to_owned()).or_default();
            if parsed.cookie.is_live(now) {
                cookies.insert(parsed.name, parsed.cookie);
            } else {
                cookies.remove(&parsed.name);
            }
        }
    }

    /// The `Cookie` header value for `host`, skipping expired entries.
    pub(crate) fn header(&self, host: &str, now: SystemTime) -> Option<String> {
        let live = self
            .hosts
            .get(host)?
            .iter()
            .filter(|(_, cookie)| cookie.is_live(now))
            .map(|(name, cookie)| format!("{name}={}", cookie.value))
            .collect::<Vec<_>>();
        (!live.is_empty()).then(|| live.join("; "))
    }
}

/// Parses `Sun, 06 Nov 1994 08:49:37 GMT` and the older dashed
/// `Sunday, 06-Nov-94 08:49:37 GMT` form.
fn parse_http_date(raw: &str) -> Option<SystemTime> {
    let (_, rest) = raw.split_once(',')?;
    let mut parts = rest
        .split(|c: char| c == ' ' || c == '-')
        .filter(|part| !part.is_empty());

    let day: i64 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?;
    let month = MONTHS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(month_name))? as i64
        + 1;
    let year = match parts.next()?.parse::<i64>().ok()? {
        year @ 0..=69 => year + 2000,
        year @ 70..=99 => year + 1900,
        year => year,
    };
    let mut clock = parts.next()?.split(':').map(|part| part.parse::<i64>().ok());
    let (hour, minute, second) = (clock.next()??, clock.next()??, clock.next()??);
    if !parts.next()?.eq_ignore_ascii_case("gmt") || hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    let days = days_from_civil(year, month, day)?;
    let seconds = days * 86_400 + hour * 3_600 + minute * 60 + second;
    // Dates before the epoch are just as expired as the epoch itself.
    Some(UNIX_EPOCH + Duration::from_secs(u64::try_from(seconds).unwrap_or(0)))
}

/// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i64, month: i64, day: i64) -> Option<i64> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    Some(era * 146_097 + day_of_era - 719_468)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn set_cookie(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(SET_COOKIE, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    fn at(seconds: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }

    #[test]
    fn http_dates() {
        // 784111777 is Sun, 06 Nov 1994 08:49:37 GMT.
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT"), Some(at(784_111_777)));
        assert_eq!(parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"), Some(at(784_111_777)));
        assert_eq!(parse_http_date("Thu, 01 Jan 1970 00:00:00 GMT"), Some(UNIX_EPOCH));
        assert_eq!(parse_http_date("Wed, 01 Mar 2000 00:00:00 GMT"), Some(at(951_868_800)));
    }

    #[test]
    fn malformed_http_dates() {
        assert_eq!(parse_http_date("06 Nov 1994 08:49:37 GMT"), None);
        assert_eq!(parse_http_date("Sun, 06 Foo 1994 08:49:37 GMT"), None);
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49 GMT"), None);
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49:37 PST"), None);
    }

    #[test]
    fn max_age_takes_precedence_over_expires() {
        let parsed = SetCookie::parse(
            "id=7; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=60",
            at(1_000),
        )
        .unwrap();
        assert_eq!(parsed.name, "id");
        assert_eq!(parsed.cookie.value, "7");
        assert_eq!(parsed.cookie.expires, Some(at(1_060)));
    }

    #[test]
    fn nameless_cookies_are_ignored() {
        assert_eq!(SetCookie::parse("=value", at(0)), None);
        assert_eq!(SetCookie::parse("novalue", at(0)), None);
    }

    #[test]
    fn max_age_zero_deletes() {
        let mut jar = CookieJar::default();
        jar.store("h", &set_cookie(&["session=abc"]), at(1_000));
        jar.store("h", &set_cookie(&["session=deleted; Max-Age=0"]), at(1_001));
        assert_eq!(jar.header("h", at(1_002)), None);
    }

    #[test]
    fn past_expires_deletes() {
        let mut jar = CookieJar::default();
        jar.store("h", &set_cookie(&["session=abc", "theme=dark"]), at(1_000));
        jar.store(
            "h",
            &set_cookie(&["session=gone; Expires=Thu, 01 Jan 1970 00:00:00 GMT"]),
            at(1_001),
        );
        assert_eq!(jar.header("h", at(1_002)).as_deref(), Some("theme=dark"));
    }

    #[test]
    fn cookies_lapse_after_max_age() {
        let mut jar = CookieJar::default();
        jar.store("h", &set_cookie(&["token=t; Max-Age=30"]), at(1_000));
        assert_eq!(jar.header("h", at(1_029)).as_deref(), Some("token=t"));
        assert_eq!(jar.header("h", at(1_030)), None);
    }

    #[test]
    fn future_expires_keeps_cookie() {
        let mut jar = CookieJar::default();
        jar.store(
            "h",
            &set_cookie(&["token=t; Expires=Wed, 01 Mar 2000 00:00:00 GMT"]),
            at(1_000),
        );
        assert_eq!(jar.header("h", at(1_000)).as_deref(), Some("token=t"));
    }

    #[test]
    fn empty_values_are_kept() {
        let mut jar = CookieJar::default();
        jar.store("h", &set_cookie(&["flag="]), at(0));
        assert_eq!(jar.header("h", at(0)).as_deref(), Some("flag="));
    }
}
