//! 内部宏
//!
//! 状态、类型等枚举都需要同一组能力：稳定的英文键（序列化、命令行参数）、
//! 中文标签（界面显示）、`FromStr` 与 `Display`。

/// 定义带键和中文标签的枚举
///
/// ```ignore
/// labeled_enum! {
///     /// 服药状态
///     pub enum ReminderStatus {
///         Pending => ("pending", "待服用"),
///         Taken => ("taken", "已服用"),
///     }
/// }
/// ```
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => ($key:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            /// 全部取值（声明顺序）
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// 英文键
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// 中文标签
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::records::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($key) {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::records::UnknownVariant {
                    kind: stringify!($name),
                    value: s.to_string(),
                })
            }
        }
    };
}
