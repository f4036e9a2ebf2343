use super::MapObject;

/// A chain of sequential hit objects sharing
/// a combo number and colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub number: usize,
    /// Index into the combo colour palette, not wrapped
    pub colour_index: usize,
    pub len: usize,
}

/// Where an object sits inside its combo
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ComboPosition {
    pub combo: usize,
    /// Zero based, the number drawn on a circle is `index + 1`
    pub index: usize,
}

/// Groups objects into combos based on their `new_combo`
/// flags. First object always starts a combo.
pub fn build_combos(objects: &[MapObject]) -> (Vec<Combo>, Vec<ComboPosition>) {
    let mut combos: Vec<Combo> = Vec::new();
    let mut positions = Vec::with_capacity(objects.len());

    for object in objects {
        let starts_combo = object.new_combo || combos.is_empty();

        if starts_combo {
            let colour_index = match combos.last() {
                Some(last) => last.colour_index + 1 + object.combo_offset as usize,
                None => object.combo_offset as usize,
            };

            combos.push(Combo {
                number: combos.len(),
                colour_index,
                len: 0,
            });
        }

        let number = combos.len() - 1;
        let combo = &mut combos[number];

        positions.push(ComboPosition {
            combo: number,
            index: combo.len,
        });

        combo.len += 1;
    }

    (combos, positions)
}
