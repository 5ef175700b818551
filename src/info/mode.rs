//! Permission bit decoding
//!
//! Pure mapping from a raw `st_mode` value to its octal and `ls -l` style forms.

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Permission and special bits only
pub const PERMISSION_MASK: u32 = 0o7777;

/// (read, write, execute, special bit, special char when executable, when not)
const TRIPLETS: [(u32, u32, u32, u32, char, char); 3] = [
    (0o400, 0o200, 0o100, S_ISUID, 's', 'S'),
    (0o040, 0o020, 0o010, S_ISGID, 's', 'S'),
    (0o004, 0o002, 0o001, S_ISVTX, 't', 'T'),
];

/// Single-character file type glyph
pub fn file_type_glyph(mode: u32) -> char {
    match mode & S_IFMT {
        S_IFSOCK => 's',
        S_IFLNK => 'l',
        S_IFREG => '-',
        S_IFBLK => 'b',
        S_IFDIR => 'd',
        S_IFCHR => 'c',
        S_IFIFO => 'p',
        _ => 'u',
    }
}

/// 10-character symbolic form, e.g. `drwxrwxr-x`
pub fn mode_to_symbolic(mode: u32) -> String {
    let mut symbolic = String::with_capacity(10);
    symbolic.push(file_type_glyph(mode));

    for (read, write, execute, special, set_exec, set_no_exec) in TRIPLETS {
        symbolic.push(if mode & read != 0 { 'r' } else { '-' });
        symbolic.push(if mode & write != 0 { 'w' } else { '-' });
        let exec = mode & execute != 0;
        let flagged = mode & special != 0;
        symbolic.push(match (exec, flagged) {
            (true, true) => set_exec,
            (true, false) => 'x',
            (false, true) => set_no_exec,
            (false, false) => '-',
        });
    }

    symbolic
}

/// 4-digit octal form, e.g. `0755`
pub fn mode_to_octal(mode: u32) -> String {
    format!("{:04o}", mode & PERMISSION_MASK)
}

/// Parse an octal mode string such as `"0755"`, `"755"` or `"0o755"`
pub fn parse_octal_mode(mode: &str) -> Option<u32> {
    let trimmed = mode.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|value| *value <= PERMISSION_MASK)
}
