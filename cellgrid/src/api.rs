//! Capability table for scripting runtimes.
//!
//! A runtime adapter binds each named [`Operation`] into its own language and
//! forwards calls as slices of [`Value`]s. The table owns argument checking:
//! arity, types, colors and face indices are validated here, before anything
//! reaches the engine.

use std::collections::HashMap;
use std::fmt;

use cellgrid_font::{Face, FontSource};

use crate::color::Rgba;
use crate::context::Context;
use crate::draw::BoxDrawMode;
use crate::error::{EngineError, Result};

/// A value crossing the scripting boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    fn pair<T: Into<Value>>((a, b): (T, T)) -> Value {
        Value::List(vec![a.into(), b.into()])
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Positional arguments of one call, tagged with the operation name for
/// error messages.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    op: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(op: &'static str, values: &'a [Value]) -> Self {
        Self { op, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn invalid(&self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidArgument {
            op: self.op,
            reason: reason.into(),
        }
    }

    /// Fail unless `min <= len <= max`.
    pub fn arity(&self, min: usize, max: usize) -> Result<()> {
        let n = self.values.len();
        if n < min || n > max {
            let expected = if min == max { min.to_string() } else { format!("{min}..={max}") };
            return Err(self.invalid(format!("expected {expected} arguments, got {n}")));
        }
        Ok(())
    }

    /// Argument `i`, with trailing missing arguments reading as `Nil`.
    pub fn get(&self, i: usize) -> &'a Value {
        const NIL: &Value = &Value::Nil;
        self.values.get(i).unwrap_or(NIL)
    }

    fn mismatch(&self, i: usize, expected: &str) -> EngineError {
        self.invalid(format!("argument {} must be {expected}, got {}", i + 1, self.get(i).type_name()))
    }

    pub fn int(&self, i: usize) -> Result<i64> {
        self.get(i).as_int().ok_or_else(|| self.mismatch(i, "an int"))
    }

    /// Cell coordinate or extent. Values beyond `i32` saturate, so the draw
    /// clips them away like any other off-grid position.
    pub fn coord(&self, i: usize) -> Result<i32> {
        let v = self.int(i)?;
        Ok(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    pub fn float(&self, i: usize) -> Result<f64> {
        self.get(i).as_float().ok_or_else(|| self.mismatch(i, "a number"))
    }

    pub fn bool(&self, i: usize) -> Result<bool> {
        self.get(i).as_bool().ok_or_else(|| self.mismatch(i, "a bool"))
    }

    pub fn str(&self, i: usize) -> Result<&'a str> {
        self.get(i).as_str().ok_or_else(|| self.mismatch(i, "a string"))
    }

    /// A list of 3 or 4 integers in `0..=255`.
    pub fn color(&self, i: usize) -> Result<Rgba> {
        let value = self.get(i);
        let components = value
            .as_list()
            .and_then(|items| items.iter().map(Value::as_int).collect::<Option<Vec<_>>>());
        components
            .as_deref()
            .and_then(Rgba::from_components)
            .ok_or_else(|| EngineError::InvalidColor(value.to_string()))
    }

    /// Optional face index; `nil` or absent is the regular face.
    pub fn face(&self, i: usize) -> Result<Face> {
        match self.get(i) {
            Value::Nil => Ok(Face::Regular),
            Value::Int(index) => Ok(Face::try_from(*index)?),
            _ => Err(self.mismatch(i, "a face index")),
        }
    }

    /// Optional non-negative count.
    pub fn opt_count(&self, i: usize) -> Result<Option<usize>> {
        match self.get(i) {
            Value::Nil => Ok(None),
            Value::Int(n) => usize::try_from(*n)
                .map(Some)
                .map_err(|_| self.invalid(format!("argument {} must be >= 0, got {n}", i + 1))),
            _ => Err(self.mismatch(i, "an int")),
        }
    }
}

pub type OperationFn = fn(&mut Context<'_>, &Args<'_>) -> Result<Value>;

/// One named capability.
#[derive(Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    /// Human-readable signature, e.g. `cell(x, y, color)`.
    pub signature: &'static str,
    pub call: OperationFn,
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation").field("signature", &self.signature).finish()
    }
}

/// Registry of the operations a script can call.
#[derive(Debug)]
pub struct ApiTable {
    ops: HashMap<&'static str, Operation>,
}

impl ApiTable {
    /// Create a table with every built-in operation registered.
    pub fn new() -> Self {
        let mut table = Self::empty();

        // Drawing
        table.register("clear", "clear(color)", op_clear);
        table.register("cell", "cell(x, y, color)", op_cell);
        table.register("rect", "rect(x, y, w, h, color)", op_rect);
        table.register("glyph", "glyph(x, y, color, text, face?)", op_glyph);
        table.register("text", "text(x, y, text, color, face?, max_cells?)", op_text);

        // Input
        table.register("key_down", "key_down(token)", op_key_down);
        table.register("key_pressed", "key_pressed(token)", op_key_pressed);
        table.register("key_released", "key_released(token)", op_key_released);
        table.register("key_repeat", "key_repeat(token)", op_key_repeat);
        table.register("mouse_pos", "mouse_pos()", op_mouse_pos);
        table.register("mouse_pos_px", "mouse_pos_px()", op_mouse_pos_px);
        table.register("mouse_wheel", "mouse_wheel()", op_mouse_wheel);
        table.register("mouse_delta", "mouse_delta()", op_mouse_delta);
        table.register("text_input", "text_input()", op_text_input);

        // Grid and fonts
        table.register("grid_size", "grid_size()", op_grid_size);
        table.register("cell_size", "cell_size()", op_cell_size);
        table.register("set_font_size", "set_font_size(px)", op_set_font_size);
        table.register("set_fonts", "set_fonts(regular, bold, italic, bold_italic)", op_set_fonts);
        table.register("set_box_drawing", "set_box_drawing(mode)", op_set_box_drawing);

        // Control
        table.register("quit", "quit()", op_quit);

        table
    }

    pub fn empty() -> Self {
        Self { ops: HashMap::new() }
    }

    /// Register an operation, replacing any previous one with the same name.
    pub fn register(&mut self, name: &'static str, signature: &'static str, call: OperationFn) {
        self.ops.insert(name, Operation { name, signature, call });
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.ops.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ops.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn call(&self, ctx: &mut Context<'_>, name: &str, args: &[Value]) -> Result<Value> {
        let op = self
            .get(name)
            .ok_or_else(|| EngineError::UnknownOperation(name.to_string()))?;
        (op.call)(ctx, &Args::new(op.name, args))
    }
}

impl Default for ApiTable {
    fn default() -> Self {
        Self::new()
    }
}

fn op_clear(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    ctx.clear(args.color(0)?)?;
    Ok(Value::Nil)
}

fn op_cell(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(3, 3)?;
    ctx.cell(args.coord(0)?, args.coord(1)?, args.color(2)?)?;
    Ok(Value::Nil)
}

fn op_rect(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(5, 5)?;
    let (x, y, w, h) = (args.coord(0)?, args.coord(1)?, args.coord(2)?, args.coord(3)?);
    ctx.rect(x, y, w, h, args.color(4)?)?;
    Ok(Value::Nil)
}

fn op_glyph(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(4, 5)?;
    let (x, y, color) = (args.coord(0)?, args.coord(1)?, args.color(2)?);
    let text = args.str(3)?;
    let face = args.face(4)?;
    ctx.glyph(x, y, color, text, face)?;
    Ok(Value::Nil)
}

fn op_text(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(4, 6)?;
    let (x, y) = (args.coord(0)?, args.coord(1)?);
    let text = args.str(2)?;
    let color = args.color(3)?;
    let face = args.face(4)?;
    let max_cells = args.opt_count(5)?;
    let consumed = ctx.text(x, y, text, color, face, max_cells)?;
    Ok(Value::Int(consumed as i64))
}

fn op_key_down(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    Ok(ctx.input().is_down(args.str(0)?)?.into())
}

fn op_key_pressed(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    Ok(ctx.input().pressed(args.str(0)?)?.into())
}

fn op_key_released(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    Ok(ctx.input().released(args.str(0)?)?.into())
}

fn op_key_repeat(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    Ok(ctx.input().repeated(args.str(0)?)?.into())
}

fn op_mouse_pos(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.input().pointer()?))
}

fn op_mouse_pos_px(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.input().pointer_px()?))
}

fn op_mouse_wheel(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.input().wheel()?))
}

fn op_mouse_delta(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.input().mouse_delta()?))
}

fn op_text_input(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(ctx.input().text()?.into())
}

fn op_grid_size(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.grid_size()?))
}

fn op_cell_size(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    Ok(Value::pair(ctx.cell_size()?))
}

fn op_set_font_size(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    ctx.set_font_size(args.float(0)? as f32)?;
    Ok(Value::Nil)
}

fn op_set_fonts(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(Face::COUNT, Face::COUNT)?;
    let paths = [args.str(0)?, args.str(1)?, args.str(2)?, args.str(3)?];
    ctx.set_fonts(paths.map(FontSource::from))?;
    Ok(Value::Nil)
}

fn op_set_box_drawing(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(1, 1)?;
    let mode = match args.get(0) {
        Value::Bool(true) => BoxDrawMode::Geometry,
        Value::Bool(false) => BoxDrawMode::Font,
        Value::Str(s) if s == "geometry" => BoxDrawMode::Geometry,
        Value::Str(s) if s == "font" => BoxDrawMode::Font,
        other => {
            return Err(EngineError::InvalidArgument {
                op: "set_box_drawing",
                reason: format!("expected a bool, \"geometry\" or \"font\", got {other}"),
            });
        }
    };
    ctx.set_box_drawing(mode);
    Ok(Value::Nil)
}

fn op_quit(ctx: &mut Context<'_>, args: &Args<'_>) -> Result<Value> {
    args.arity(0, 0)?;
    ctx.quit();
    Ok(Value::Nil)
}
