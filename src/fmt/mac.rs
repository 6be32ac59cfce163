//! MAC-specific formatting: the dotted 16-bit, dashed, colon and
//! space-delimited forms.

use crate::{
    concrete::{Address, Mac, Section, Segment},
    error::{incompatible, Error},
    fmt::itoa,
};

use super::{render, FmtOptions, Plan};

impl Section<Mac> {
    /// The IEEE dashed form; same as the canonical string.
    pub fn to_dashed_string(&self) -> String {
        self.to_canonical_string()
    }

    /// The colon-delimited form; same as the normalized string.
    pub fn to_colon_delimited_string(&self) -> String {
        self.to_normalized_string()
    }

    /// Space-delimited byte pairs.
    pub fn to_space_delimited_string(&self) -> String {
        let opts = FmtOptions {
            separator: Some(' '),
            ..super::normalized_opts::<Mac>()
        };
        render(self, None, &opts, &Plan::default()).unwrap()
    }

    /// The dotted form: 16-bit groups separated by dots.
    ///
    /// # Errors
    ///
    /// Fails when a pair of byte ranges cannot merge into one 16-bit
    /// range.
    pub fn to_dotted_string(&self) -> Result<String, Error> {
        let mut s = String::new();
        for (i, pair) in self.segments().chunks(2).enumerate() {
            if i > 0 {
                s.push('.');
            }
            dotted_group(&pair[0], &pair[1], &mut s)?;
        }
        Ok(s)
    }
}

fn dotted_group(a: &Segment<Mac>, b: &Segment<Mac>, s: &mut String) -> Result<(), Error> {
    if a.is_multiple() && !b.is_full_range() {
        return Err(incompatible!(
            "byte ranges do not merge into one dotted group"
        ));
    }
    let lo = u32::from(a.value()) << 8 | u32::from(b.value());
    let hi = u32::from(a.upper_value()) << 8 | u32::from(b.upper_value());
    let push_group = |s: &mut String, v: u32| {
        let digits = itoa(v, 16, false);
        for _ in digits.len()..4 {
            s.push('0');
        }
        s.push_str(digits.as_str());
    };
    if lo == 0 && hi == 0xffff {
        s.push('*');
    } else if lo == hi {
        push_group(s, lo);
    } else {
        push_group(s, lo);
        s.push('»');
        push_group(s, hi);
    }
    Ok(())
}

impl Address<Mac> {
    pub fn to_dashed_string(&self) -> String {
        self.section().to_dashed_string()
    }

    pub fn to_colon_delimited_string(&self) -> String {
        self.section().to_colon_delimited_string()
    }

    pub fn to_space_delimited_string(&self) -> String {
        self.section().to_space_delimited_string()
    }

    pub fn to_dotted_string(&self) -> Result<String, Error> {
        self.section().to_dotted_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(bytes: &[u8]) -> Section<Mac> {
        Section::from_bytes(bytes).unwrap()
    }

    #[test]
    fn eui64_dotted() {
        let section = mac(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x11, 0x22]);
        assert_eq!(section.to_dotted_string().unwrap(), "aabb.ccdd.eeff.1122");
    }

    #[test]
    fn eui48_forms() {
        let section = mac(&[0xaa, 0xbb, 0xcc, 0x0d, 0xee, 0xff]);
        assert_eq!(section.to_dashed_string(), "aa-bb-cc-0d-ee-ff");
        assert_eq!(section.to_colon_delimited_string(), "aa:bb:cc:0d:ee:ff");
        assert_eq!(section.to_space_delimited_string(), "aa bb cc 0d ee ff");
        assert_eq!(section.to_dotted_string().unwrap(), "aabb.cc0d.eeff");
    }

    #[test]
    fn dotted_rejects_unmergeable_ranges() {
        let segments = vec![
            Segment::ranged(1, 2).unwrap(),
            Segment::new(5).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
            Segment::new(0).unwrap(),
        ];
        let section = Section::<Mac>::new(segments).unwrap();
        assert!(section.to_dotted_string().is_err());
    }
}
