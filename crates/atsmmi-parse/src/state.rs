//! Interpreter state: transformation matrices, the `q`/`Q` stack and the
//! text object state.

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translation(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Translation component.
    pub fn origin(&self) -> (f64, f64) {
        (self.0[4], self.0[5])
    }
}

/// Graphics state: the CTM and its save stack.
#[derive(Debug, Clone, Default)]
pub struct GraphicsState {
    ctm: Matrix,
    stack: Vec<(Matrix, TextParams)>,
}

/// Text parameters that are part of the graphics state and therefore
/// saved by `q`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextParams {
    pub font_name: String,
    pub font_size: f64,
    pub leading: f64,
}

impl GraphicsState {
    pub fn ctm(&self) -> &Matrix {
        &self.ctm
    }

    /// `cm`
    pub fn concat(&mut self, m: Matrix) {
        self.ctm = m.concat(&self.ctm);
    }

    /// `q`
    pub fn save(&mut self, params: &TextParams) {
        self.stack.push((self.ctm, params.clone()));
    }

    /// `Q`. Returns the saved text parameters, or `None` on an unbalanced `Q`.
    pub fn restore(&mut self) -> Option<TextParams> {
        let (ctm, params) = self.stack.pop()?;
        self.ctm = ctm;
        Some(params)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// State of the current text object.
#[derive(Debug, Clone, Default)]
pub struct TextState {
    pub params: TextParams,
    in_text_object: bool,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl TextState {
    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Matrix {
        &self.text_matrix
    }

    /// `BT`
    pub fn begin(&mut self) {
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
        self.in_text_object = true;
    }

    /// `ET`
    pub fn end(&mut self) {
        self.in_text_object = false;
    }

    /// `Tm` replaces both matrices.
    pub fn set_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`
    pub fn move_line_set_leading(&mut self, tx: f64, ty: f64) {
        self.params.leading = -ty;
        self.move_line(tx, ty);
    }

    /// `T*`
    pub fn next_line(&mut self) {
        let leading = self.params.leading;
        self.move_line(0.0, -leading);
    }

    /// Origin of the next glyph in page space.
    pub fn origin_in(&self, ctm: &Matrix) -> (f64, f64) {
        self.text_matrix.concat(ctm).origin()
    }
}
