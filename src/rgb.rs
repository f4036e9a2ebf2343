use cgmath::Vector3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    inner: Vector3<u8>,
}

macro_rules! parse_color {
    ($line:expr) => {{
        let trimmed = $line.trim();
        let comment = trimmed.find("//");

        if let Some(c) = comment {
            trimmed[0..c].trim()
        } else {
            trimmed
        }
    }};
}

impl Rgb {
    pub fn r(&self) -> u8 {
        self.inner.x
    }

    pub fn g(&self) -> u8 {
        self.inner.y
    }

    pub fn b(&self) -> u8 {
        self.inner.z
    }

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            inner: Vector3::new(r, g, b),
        }
    }

    /// Parses `r, g, b` with an optional trailing `//` comment
    pub fn parse(line: &str) -> Option<Self> {
        let mut split = line.split(',');

        let r = parse_color!(split.next()?).parse().ok()?;
        let g = parse_color!(split.next()?).parse().ok()?;
        let b = parse_color!(split.next()?).parse().ok()?;

        Some(Self::new(r, g, b))
    }
}

#[test]
fn test_parse() {
    assert_eq!(Rgb::parse("255, 192, 0"), Some(Rgb::new(255, 192, 0)));
    assert_eq!(Rgb::parse(" 18,124 ,255 // blue"), Some(Rgb::new(18, 124, 255)));
    assert_eq!(Rgb::parse("18,124"), None);
    assert_eq!(Rgb::parse("300,0,0"), None);
}
