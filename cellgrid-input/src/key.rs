//! Keyboard keys and mouse buttons with their canonical token spellings.
//!
//! Each enum and its spelling come from a single table, so there is exactly
//! one token per physical key and no aliases.

use std::fmt;

/// Declare a closed key enum together with its token spellings.
///
/// Generates `ALL`, `COUNT`, `index()` and `token()`; variants are numbered
/// from zero in declaration order so `index()` can address flat arrays.
macro_rules! define_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const COUNT: usize = $name::ALL.len();

            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Canonical token spelling.
            pub const fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

define_keys! {
    /// A physical keyboard key.
    pub enum Key {
        A => "a", B => "b", C => "c", D => "d", E => "e", F => "f", G => "g",
        H => "h", I => "i", J => "j", K => "k", L => "l", M => "m", N => "n",
        O => "o", P => "p", Q => "q", R => "r", S => "s", T => "t", U => "u",
        V => "v", W => "w", X => "x", Y => "y", Z => "z",

        Num0 => "0", Num1 => "1", Num2 => "2", Num3 => "3", Num4 => "4",
        Num5 => "5", Num6 => "6", Num7 => "7", Num8 => "8", Num9 => "9",

        F1 => "f1", F2 => "f2", F3 => "f3", F4 => "f4", F5 => "f5", F6 => "f6",
        F7 => "f7", F8 => "f8", F9 => "f9", F10 => "f10", F11 => "f11", F12 => "f12",

        Minus => "-",
        Equals => "=",
        LeftBracket => "[",
        RightBracket => "]",
        Backslash => "\\",
        Semicolon => ";",
        Apostrophe => "'",
        Comma => ",",
        Period => ".",
        Slash => "/",
        Grave => "`",

        Space => "space",
        Return => "return",
        Escape => "escape",
        Backspace => "backspace",
        Tab => "tab",
        CapsLock => "capslock",
        PrintScreen => "printscreen",
        ScrollLock => "scrolllock",
        Pause => "pause",

        Insert => "insert",
        Delete => "delete",
        Home => "home",
        End => "end",
        PageUp => "pageup",
        PageDown => "pagedown",

        Up => "up",
        Down => "down",
        Left => "left",
        Right => "right",

        NumLock => "numlock",
        Kp0 => "kp0", Kp1 => "kp1", Kp2 => "kp2", Kp3 => "kp3", Kp4 => "kp4",
        Kp5 => "kp5", Kp6 => "kp6", Kp7 => "kp7", Kp8 => "kp8", Kp9 => "kp9",
        KpDivide => "kp/",
        KpMultiply => "kp*",
        KpMinus => "kp-",
        KpPlus => "kp+",
        KpEnter => "kpenter",
        KpPeriod => "kp.",

        LCtrl => "lctrl",
        LShift => "lshift",
        LAlt => "lalt",
        LGui => "lgui",
        RCtrl => "rctrl",
        RShift => "rshift",
        RAlt => "ralt",
        RGui => "rgui",
    }
}

define_keys! {
    /// A mouse button, numbered the way most platforms report them.
    pub enum MouseButton {
        Left => "mouse1",
        Middle => "mouse2",
        Right => "mouse3",
        Back => "mouse4",
        Forward => "mouse5",
    }
}
