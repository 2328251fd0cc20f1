//! World: the owned block collection plus sorting, painting and queries.
//!
//! Mutations that change what is drawn (`add_*`, `remove_*`, `move_block`)
//! run a full render pass before returning. Low-level mutators meant for
//! animation drivers (`set_position`, `set_size`, `camera_mut`) only mark the
//! world dirty; callers re-render once per frame.

use std::collections::HashMap;

use glam::{DVec2, DVec3};

use crate::camera::{Camera, CameraConfig};
use crate::errors::IsoError;
use crate::log::debug;
use crate::render::{BlockGeometry, Painter};
use crate::sort::sort_blocks;
use crate::types::{Adjacent, Block, BlockId, Direction, Heading, IsoPoint};

/// One entry of the draw list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub id: BlockId,
    pub block: Block,
    pub adjacent: Adjacent,
    pub geometry: BlockGeometry,
}

/// A transient preview block that is painted but never sorted or stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub block: Block,
    pub geometry: BlockGeometry,
}

#[derive(Debug, Clone)]
struct Entry {
    id: BlockId,
    block: Block,
}

type Cell = (i64, i64, i64);

fn cell_of(point: DVec3) -> Cell {
    let p = point.floor();
    (p.x as i64, p.y as i64, p.z as i64)
}

/// Blocks keyed by the integer cell of their minimum corner.
///
/// When several blocks share a cell, the earliest inserted wins.
#[derive(Debug, Default)]
struct CellIndex {
    cells: HashMap<Cell, BlockId>,
}

impl CellIndex {
    fn build(entries: &[Entry]) -> Self {
        let mut cells = HashMap::with_capacity(entries.len());
        for entry in entries {
            cells.entry(cell_of(entry.block.position)).or_insert(entry.id);
        }
        Self { cells }
    }

    fn get(&self, point: DVec3) -> Option<BlockId> {
        self.cells.get(&cell_of(point)).copied()
    }

    fn adjacent(&self, block: &Block) -> Adjacent {
        let origin = block.cell();
        let mut adjacent = Adjacent::default();
        for dir in Direction::ALL {
            adjacent.set(dir, self.get(origin + dir.offset()));
        }
        adjacent
    }
}

/// An owned scene of blocks viewed through one camera.
#[derive(Debug, Clone)]
pub struct World {
    camera: Camera,
    entries: Vec<Entry>,
    next_id: u32,
    sorted: Vec<RenderedBlock>,
    forced: Vec<BlockId>,
    dirty: bool,
    hovered: Option<BlockId>,
    selected: Option<BlockId>,
    cursor: Option<Cursor>,
    z_cursor: f64,
    viewport: Option<DVec2>,
}

impl World {
    /// An empty world with a camera built from `config`.
    pub fn new(config: &CameraConfig) -> Result<Self, IsoError> {
        Ok(Self::with_camera(Camera::from_config(config)?))
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            entries: Vec::new(),
            next_id: 0,
            sorted: Vec::new(),
            forced: Vec::new(),
            dirty: false,
            hovered: None,
            selected: None,
            cursor: None,
            z_cursor: 0.0,
            viewport: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for pan/zoom; marks the world dirty.
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.dirty = true;
        &mut self.camera
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.entry(id).map(|e| &e.block)
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.block))
    }

    pub fn add_block(&mut self, block: Block) -> BlockId {
        let id = self.insert(block);
        self.render();
        id
    }

    pub fn add_blocks(&mut self, blocks: impl IntoIterator<Item = Block>) -> Vec<BlockId> {
        let ids: Vec<BlockId> = blocks.into_iter().map(|b| self.insert(b)).collect();
        self.render();
        ids
    }

    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let removed = self.take(id);
        self.render();
        removed
    }

    /// Remove every listed block that exists; unknown ids are skipped.
    pub fn remove_blocks(&mut self, ids: &[BlockId]) -> Vec<Block> {
        let removed = ids.iter().filter_map(|&id| self.take(id)).collect();
        self.render();
        removed
    }

    fn insert(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, block });
        self.dirty = true;
        debug!(id = %id, "block added");
        id
    }

    fn take(&mut self, id: BlockId) -> Option<Block> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(index);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.dirty = true;
        debug!(id = %id, "block removed");
        Some(entry.block)
    }

    fn entry(&self, id: BlockId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: BlockId) -> Result<&mut Entry, IsoError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(IsoError::UnknownBlock { id })
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Step a block one cell along the ground and drop it onto the column.
    ///
    /// The block comes to rest on the highest top face found in the target
    /// column, or on the ground when the column is empty. Returns the new
    /// position.
    pub fn move_block(&mut self, id: BlockId, heading: Heading) -> Result<DVec3, IsoError> {
        let block = *self.block(id).ok_or(IsoError::UnknownBlock { id })?;
        let mut next = block.position + heading.direction().offset();

        next.z = self
            .column(next)
            .into_iter()
            .filter(|&other| other != id)
            .filter_map(|other| self.block(other).map(Block::top))
            .reduce(f64::max)
            .unwrap_or(0.0);

        self.entry_mut(id)?.block.move_to(next);
        self.dirty = true;
        debug!(id = %id, ?heading, x = next.x, y = next.y, z = next.z, "block moved");
        self.render();
        Ok(next)
    }

    /// Set a block's position without rendering.
    pub fn set_position(&mut self, id: BlockId, position: DVec3) -> Result<(), IsoError> {
        self.entry_mut(id)?.block.move_to(position);
        self.dirty = true;
        Ok(())
    }

    /// Set a block's size without rendering.
    pub fn set_size(&mut self, id: BlockId, size: DVec3) -> Result<(), IsoError> {
        self.entry_mut(id)?.block.resize_to(size);
        self.dirty = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The block whose minimum corner lies in the same integer cell as `point`.
    pub fn block_at(&self, point: DVec3) -> Option<BlockId> {
        let cell = cell_of(point);
        self.entries
            .iter()
            .find(|e| cell_of(e.block.position) == cell)
            .map(|e| e.id)
    }

    /// Blocks standing in the ground column of `point`, lowest first.
    pub fn column(&self, point: DVec3) -> Vec<BlockId> {
        let (x, y, _) = cell_of(point);
        let mut found: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| {
                let (bx, by, _) = cell_of(e.block.position);
                bx == x && by == y
            })
            .collect();
        found.sort_by(|a, b| a.block.position.z.total_cmp(&b.block.position.z));
        found.into_iter().map(|e| e.id).collect()
    }

    /// Neighbors of a block in the current collection.
    pub fn adjacency(&self, id: BlockId) -> Option<Adjacent> {
        let block = self.block(id)?;
        Some(CellIndex::build(&self.entries).adjacent(block))
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Sort every block and rebuild its geometry.
    pub fn render(&mut self) -> &[RenderedBlock] {
        let blocks: Vec<Block> = self.entries.iter().map(|e| e.block).collect();
        let order = sort_blocks(&blocks);
        let cells = CellIndex::build(&self.entries);
        let painter = Painter::new(&self.camera);

        let sorted: Vec<RenderedBlock> = order
            .order
            .iter()
            .map(|&index| {
                let entry = &self.entries[index];
                let adjacent = cells.adjacent(&entry.block);
                RenderedBlock {
                    id: entry.id,
                    block: entry.block,
                    adjacent,
                    geometry: painter.paint(&entry.block, &adjacent),
                }
            })
            .collect();
        let forced = order.forced.iter().map(|&i| self.entries[i].id).collect();
        let cursor = self.cursor.as_ref().map(|c| self.paint_cursor(c.block));

        self.sorted = sorted;
        self.forced = forced;
        self.cursor = cursor;
        self.dirty = false;
        debug!(
            blocks = self.sorted.len(),
            forced = self.forced.len(),
            "render pass finished"
        );
        &self.sorted
    }

    /// Draw list from the last render pass, back to front.
    ///
    /// Stale while [`is_dirty`](Self::is_dirty) is true.
    pub fn sorted(&self) -> &[RenderedBlock] {
        &self.sorted
    }

    pub fn rendered(&self, id: BlockId) -> Option<&RenderedBlock> {
        self.sorted.iter().find(|r| r.id == id)
    }

    /// Blocks the last pass had to release early to break occlusion cycles.
    pub fn forced(&self) -> &[BlockId] {
        &self.forced
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ------------------------------------------------------------------
    // Interaction state
    // ------------------------------------------------------------------

    pub fn hovered(&self) -> Option<BlockId> {
        self.hovered
    }

    pub fn set_hovered(&mut self, id: Option<BlockId>) {
        self.hovered = id;
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<BlockId>) {
        self.selected = id;
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Place (or clear) the preview block at `point` with the given shape.
    pub fn set_cursor(&mut self, point: Option<DVec3>, shape: DVec3) {
        self.cursor = point.map(|p| self.paint_cursor(Block::new(p, shape)));
    }

    fn paint_cursor(&self, block: Block) -> Cursor {
        Cursor {
            block,
            geometry: Painter::new(&self.camera).paint(&block, &Adjacent::default()),
        }
    }

    /// Height at which pointer positions are resolved.
    pub fn z_cursor(&self) -> f64 {
        self.z_cursor
    }

    pub fn set_z_cursor(&mut self, z: f64) {
        self.z_cursor = z;
    }

    pub fn raise_z_cursor(&mut self) {
        self.z_cursor += 1.0;
    }

    pub fn lower_z_cursor(&mut self) {
        self.z_cursor -= 1.0;
    }

    /// Page offset of the drawing surface.
    pub fn attach_viewport(&mut self, offset: DVec2) {
        self.viewport = Some(offset);
    }

    pub fn detach_viewport(&mut self) {
        self.viewport = None;
    }

    /// Front-most block whose silhouette contains the screen point.
    ///
    /// Uses the last render pass with nonzero winding; points exactly on a
    /// boundary may go either way.
    pub fn pick(&self, screen: DVec2) -> Option<BlockId> {
        self.sorted
            .iter()
            .rev()
            .find(|r| r.geometry.silhouette.contains(screen))
            .map(|r| r.id)
    }

    /// Translate a page-space pointer position to iso coordinates at the
    /// current z cursor.
    pub fn pointer_to_iso(&self, pointer: DVec2, floor: bool) -> Result<IsoPoint, IsoError> {
        let offset = self.viewport.ok_or(IsoError::NoViewport)?;
        Ok(self
            .camera
            .screen_to_iso(pointer - offset, self.z_cursor, floor))
    }
}
