
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;


/// Ordered variant lists per base char .. lowercase and uppercase bases are listed separately as some only exist in one case
static VARIANTS: Lazy <FxHashMap <char, &'static [char]>> = Lazy::new ( || {
    let table: &[(char, &'static [char])] = &[

        // latin vowels
        ('a', &['à', 'á', 'â', 'ä', 'æ', 'ã', 'å', 'ā']),
        ('e', &['è', 'é', 'ê', 'ë', 'ē', 'ė', 'ę']),
        ('i', &['ì', 'í', 'î', 'ï', 'ī', 'į']),
        ('o', &['ò', 'ó', 'ô', 'ö', 'õ', 'ø', 'ō', 'œ']),
        ('u', &['ù', 'ú', 'û', 'ü', 'ū']),
        ('y', &['ÿ', 'ý']),
        ('A', &['À', 'Á', 'Â', 'Ä', 'Æ', 'Ã', 'Å', 'Ā']),
        ('E', &['È', 'É', 'Ê', 'Ë', 'Ē', 'Ė', 'Ę']),
        ('I', &['Ì', 'Í', 'Î', 'Ï', 'Ī', 'Į']),
        ('O', &['Ò', 'Ó', 'Ô', 'Ö', 'Õ', 'Ø', 'Ō', 'Œ']),
        ('U', &['Ù', 'Ú', 'Û', 'Ü', 'Ū']),
        ('Y', &['Ÿ', 'Ý']),

        // latin consonants
        ('c', &['ç', 'ć', 'č']),   ('C', &['Ç', 'Ć', 'Č']),
        ('n', &['ñ', 'ń']),        ('N', &['Ñ', 'Ń']),
        ('s', &['ß', 'ś', 'š']),   ('S', &['Ś', 'Š']),
        ('z', &['ž', 'ź', 'ż']),   ('Z', &['Ž', 'Ź', 'Ż']),
        ('l', &['ł']),   ('L', &['Ł']),
        ('d', &['ð']),   ('D', &['Ð']),
        ('t', &['þ']),   ('T', &['Þ']),

        // greek
        ('α', &['ά']),   ('ε', &['έ']),   ('η', &['ή']),   ('ι', &['ί', 'ϊ', 'ΐ']),
        ('ο', &['ό']),   ('υ', &['ύ', 'ϋ', 'ΰ']),   ('ω', &['ώ']),
        ('Α', &['Ά']),   ('Ε', &['Έ']),   ('Η', &['Ή']),   ('Ι', &['Ί', 'Ϊ']),
        ('Ο', &['Ό']),   ('Υ', &['Ύ', 'Ϋ']),   ('Ω', &['Ώ']),

        // cyrillic (russian, ukrainian, belarusian)
        ('е', &['ё']),   ('Е', &['Ё']),
        ('и', &['й']),   ('И', &['Й']),
        ('і', &['ї']),   ('І', &['Ї']),
        ('г', &['ґ']),   ('Г', &['Ґ']),
        ('у', &['ў']),   ('У', &['Ў']),

        // punctuation .. the semicolon is the greek question mark
        ('?',  &['¿', ';']),
        ('!',  &['¡']),
        ('"',  &['\u{201C}', '\u{201D}', '\u{201E}', '\u{00BB}', '\u{00AB}']),
        ('\'', &['\u{2018}', '\u{2019}', '\u{201A}', '\u{203A}', '\u{2039}']),
        ('-',  &['\u{2013}', '\u{2014}', '\u{00B7}']),
        ('.',  &['…', '•']),
    ];

    // every currency symbol offers all the others, in ring order
    static CURRENCIES: [char; 10] = ['$', '€', '£', '¥', '¢', '₹', '₽', '₩', '₪', '₿'];
    static CURRENCY_RINGS: Lazy <Vec <(char, Vec<char>)>> = Lazy::new ( || {
        CURRENCIES .iter() .map ( |c| (*c, CURRENCIES.iter() .filter (|o| *o != c) .copied() .collect()) ) .collect()
    } );

    table .iter() .copied()
        .chain ( CURRENCY_RINGS .iter() .map ( |(c, ring)| (*c, ring.as_slice()) ) )
        .collect()
} );



/// The ordered variants for a base char, as stored (no case applied)
pub fn variants_of (c:char) -> Option <&'static [char]> {
    VARIANTS .get(&c) .copied()
}

pub fn has_variants (c:char) -> bool {
    VARIANTS .contains_key(&c)
}


/// Single-char case mapping .. chars whose mapping expands to several chars (ß -> SS) are kept as they are
pub fn apply_case_char (c:char, upper:bool) -> char {
    let mut mapped = if upper { c.to_uppercase().collect::<Vec<char>>() } else { c.to_lowercase().collect::<Vec<char>>() };
    if mapped.len() == 1 { mapped.remove(0) } else { c }
}

/// Case-applied snapshot of a variant list, matching the live shift state
pub fn apply_case (variants: &[char], upper:bool) -> Vec<char> {
    variants .iter() .map (|c| apply_case_char (*c, upper)) .collect()
}
