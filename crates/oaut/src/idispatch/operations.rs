//! Operation envelopes for IDispatch
//!
//! Each method gets an envelope struct carrying both directions of its
//! stub data, plus request/response DTOs that convert to and from the
//! envelope by field copies.

use dcom::{InterfacePointer, Operation, OrpcThat, OrpcThis, Result, Uuid};
use ndr::{NdrMarshal, NdrPointee, NdrReader, NdrUnmarshal, NdrWriter, WString};

use crate::dispparams::{DispParams, ExcepInfo, VariantSlots};
use crate::variant::Variant;

pub const OPNUM_GET_TYPE_INFO_COUNT: u16 = 3;
pub const OPNUM_GET_TYPE_INFO: u16 = 4;
pub const OPNUM_GET_IDS_OF_NAMES: u16 = 5;
pub const OPNUM_INVOKE: u16 = 6;

// GetTypeInfoCount (opnum 3)

#[derive(Debug, Default)]
pub struct GetTypeInfoCountOperation {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub type_info_count: u32,
    pub return_code: i32,
}

impl Operation for GetTypeInfoCountOperation {
    fn op_num(&self) -> u16 {
        OPNUM_GET_TYPE_INFO_COUNT
    }

    fn op_name(&self) -> &'static str {
        "/IDispatch/v0/GetTypeInfoCount"
    }

    fn marshal_ndr_request(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_request_payload()?;
        self.this.marshal_ndr(w)?;
        w.write_deferred()?;
        Ok(())
    }

    fn unmarshal_ndr_request(&mut self, r: &mut NdrReader) -> Result<()> {
        let this = OrpcThis::read_repr(r)?;
        r.read_deferred()?;
        self.this = OrpcThis::take_repr(this, r)?;
        Ok(())
    }

    fn marshal_ndr_response(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_response_payload()?;
        self.that.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_u32(self.type_info_count);
        w.write_i32(self.return_code);
        Ok(())
    }

    fn unmarshal_ndr_response(&mut self, r: &mut NdrReader) -> Result<()> {
        let that = OrpcThat::read_repr(r)?;
        r.read_deferred()?;
        self.that = OrpcThat::take_repr(that, r)?;
        self.type_info_count = r.read_u32()?;
        self.return_code = r.read_i32()?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetTypeInfoCountRequest {
    pub this: OrpcThis,
}

impl GetTypeInfoCountRequest {
    pub fn to_op(&self) -> GetTypeInfoCountOperation {
        GetTypeInfoCountOperation {
            this: self.this.clone(),
            ..Default::default()
        }
    }

    pub fn from_op(op: &GetTypeInfoCountOperation) -> Self {
        Self {
            this: op.this.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetTypeInfoCountResponse {
    pub that: OrpcThat,
    pub type_info_count: u32,
    pub return_code: i32,
}

impl GetTypeInfoCountResponse {
    pub fn to_op(&self, op: &mut GetTypeInfoCountOperation) {
        op.that = self.that.clone();
        op.type_info_count = self.type_info_count;
        op.return_code = self.return_code;
    }

    pub fn from_op(op: &GetTypeInfoCountOperation) -> Self {
        Self {
            that: op.that.clone(),
            type_info_count: op.type_info_count,
            return_code: op.return_code,
        }
    }
}

// GetTypeInfo (opnum 4)

#[derive(Debug, Default)]
pub struct GetTypeInfoOperation {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub type_info_index: u32,
    pub locale_id: u32,
    pub type_info: Option<InterfacePointer>,
    pub return_code: i32,
}

impl Operation for GetTypeInfoOperation {
    fn op_num(&self) -> u16 {
        OPNUM_GET_TYPE_INFO
    }

    fn op_name(&self) -> &'static str {
        "/IDispatch/v0/GetTypeInfo"
    }

    fn marshal_ndr_request(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_request_payload()?;
        self.this.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_u32(self.type_info_index);
        w.write_u32(self.locale_id);
        Ok(())
    }

    fn unmarshal_ndr_request(&mut self, r: &mut NdrReader) -> Result<()> {
        let this = OrpcThis::read_repr(r)?;
        r.read_deferred()?;
        self.this = OrpcThis::take_repr(this, r)?;
        self.type_info_index = r.read_u32()?;
        self.locale_id = r.read_u32()?;
        Ok(())
    }

    fn marshal_ndr_response(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_response_payload()?;
        self.that.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_pointer(self.type_info.as_ref())?;
        w.write_deferred()?;
        w.write_i32(self.return_code);
        Ok(())
    }

    fn unmarshal_ndr_response(&mut self, r: &mut NdrReader) -> Result<()> {
        let that = OrpcThat::read_repr(r)?;
        r.read_deferred()?;
        self.that = OrpcThat::take_repr(that, r)?;
        let type_info = r.read_pointer::<InterfacePointer>()?;
        r.read_deferred()?;
        self.type_info = type_info.take(r)?;
        self.return_code = r.read_i32()?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetTypeInfoRequest {
    pub this: OrpcThis,
    pub type_info_index: u32,
    pub locale_id: u32,
}

impl GetTypeInfoRequest {
    pub fn to_op(&self) -> GetTypeInfoOperation {
        GetTypeInfoOperation {
            this: self.this.clone(),
            type_info_index: self.type_info_index,
            locale_id: self.locale_id,
            ..Default::default()
        }
    }

    pub fn from_op(op: &GetTypeInfoOperation) -> Self {
        Self {
            this: op.this.clone(),
            type_info_index: op.type_info_index,
            locale_id: op.locale_id,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetTypeInfoResponse {
    pub that: OrpcThat,
    pub type_info: Option<InterfacePointer>,
    pub return_code: i32,
}

impl GetTypeInfoResponse {
    pub fn to_op(&self, op: &mut GetTypeInfoOperation) {
        op.that = self.that.clone();
        op.type_info = self.type_info.clone();
        op.return_code = self.return_code;
    }

    pub fn from_op(op: &GetTypeInfoOperation) -> Self {
        Self {
            that: op.that.clone(),
            type_info: op.type_info.clone(),
            return_code: op.return_code,
        }
    }
}

// GetIDsOfNames (opnum 5)

#[derive(Debug, Default)]
pub struct GetIDsOfNamesOperation {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub iid: Uuid,
    pub names: Vec<WString>,
    pub names_count: u32,
    pub locale_id: u32,
    pub dispatch_ids: Vec<i32>,
    pub return_code: i32,
}

impl Operation for GetIDsOfNamesOperation {
    fn op_num(&self) -> u16 {
        OPNUM_GET_IDS_OF_NAMES
    }

    fn op_name(&self) -> &'static str {
        "/IDispatch/v0/GetIDsOfNames"
    }

    fn prepare_request_payload(&mut self) -> Result<()> {
        if self.names_count == 0 && !self.names.is_empty() {
            self.names_count = self.names.len() as u32;
        }
        Ok(())
    }

    fn marshal_ndr_request(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_request_payload()?;
        self.this.marshal_ndr(w)?;
        w.write_deferred()?;
        self.iid.marshal_ndr(w)?;
        w.write_u32(self.names_count);
        // null-fill past the stored names up to the declared size
        for i in 0..self.names_count as usize {
            w.write_pointer(self.names.get(i))?;
        }
        w.write_deferred()?;
        w.write_u32(self.names_count);
        w.write_u32(self.locale_id);
        Ok(())
    }

    fn unmarshal_ndr_request(&mut self, r: &mut NdrReader) -> Result<()> {
        let this = OrpcThis::read_repr(r)?;
        r.read_deferred()?;
        self.this = OrpcThis::take_repr(this, r)?;
        self.iid = Uuid::unmarshal_ndr(r)?;
        let count = r.read_size(4)?;
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            handles.push(r.read_pointer::<WString>()?);
        }
        r.read_deferred()?;
        self.names = Vec::with_capacity(count);
        for handle in handles {
            self.names.push(handle.take(r)?.unwrap_or_default());
        }
        self.names_count = r.read_u32()?;
        self.locale_id = r.read_u32()?;
        Ok(())
    }

    fn marshal_ndr_response(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_response_payload()?;
        self.that.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_u32(self.names_count);
        // zero-fill past the stored IDs up to the declared size
        for i in 0..self.names_count as usize {
            w.write_i32(self.dispatch_ids.get(i).copied().unwrap_or(0));
        }
        w.write_i32(self.return_code);
        Ok(())
    }

    fn unmarshal_ndr_response(&mut self, r: &mut NdrReader) -> Result<()> {
        let that = OrpcThat::read_repr(r)?;
        r.read_deferred()?;
        self.that = OrpcThat::take_repr(that, r)?;
        let count = r.read_size(4)?;
        self.dispatch_ids = Vec::with_capacity(count);
        for _ in 0..count {
            self.dispatch_ids.push(r.read_i32()?);
        }
        self.return_code = r.read_i32()?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetIDsOfNamesRequest {
    pub this: OrpcThis,
    pub iid: Uuid,
    pub names: Vec<WString>,
    pub names_count: u32,
    pub locale_id: u32,
}

impl GetIDsOfNamesRequest {
    pub fn to_op(&self) -> GetIDsOfNamesOperation {
        GetIDsOfNamesOperation {
            this: self.this.clone(),
            iid: self.iid,
            names: self.names.clone(),
            names_count: self.names_count,
            locale_id: self.locale_id,
            ..Default::default()
        }
    }

    pub fn from_op(op: &GetIDsOfNamesOperation) -> Self {
        Self {
            this: op.this.clone(),
            iid: op.iid,
            names: op.names.clone(),
            names_count: op.names_count,
            locale_id: op.locale_id,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GetIDsOfNamesResponse {
    pub that: OrpcThat,
    pub dispatch_ids: Vec<i32>,
    pub return_code: i32,
}

impl GetIDsOfNamesResponse {
    pub fn to_op(&self, op: &mut GetIDsOfNamesOperation) {
        op.that = self.that.clone();
        op.dispatch_ids = self.dispatch_ids.clone();
        op.return_code = self.return_code;
    }

    pub fn from_op(op: &GetIDsOfNamesOperation) -> Self {
        Self {
            that: op.that.clone(),
            dispatch_ids: op.dispatch_ids.clone(),
            return_code: op.return_code,
        }
    }
}

// Invoke (opnum 6)

#[derive(Debug, Default)]
pub struct InvokeOperation {
    pub this: OrpcThis,
    pub that: OrpcThat,
    pub dispatch_id_member: i32,
    pub iid: Uuid,
    pub locale_id: u32,
    pub flags: u32,
    pub dispatch_params: DispParams,
    pub var_reference_count: u32,
    pub var_reference_index: Vec<u32>,
    pub var_reference: Vec<Option<Variant>>,
    pub var_result: Option<Variant>,
    pub exception_info: ExcepInfo,
    pub arg_error: u32,
    pub return_code: i32,
}

impl Operation for InvokeOperation {
    fn op_num(&self) -> u16 {
        OPNUM_INVOKE
    }

    fn op_name(&self) -> &'static str {
        "/IDispatch/v0/Invoke"
    }

    fn prepare_request_payload(&mut self) -> Result<()> {
        if self.var_reference_count == 0 && !self.var_reference.is_empty() {
            self.var_reference_count = self.var_reference.len() as u32;
        }
        Ok(())
    }

    fn marshal_ndr_request(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_request_payload()?;
        self.this.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_i32(self.dispatch_id_member);
        self.iid.marshal_ndr(w)?;
        w.write_u32(self.locale_id);
        w.write_u32(self.flags);
        self.dispatch_params.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_u32(self.var_reference_count);
        w.write_u32(self.var_reference_count);
        // both arrays zero-fill past the stored elements up to cVarRef
        for i in 0..self.var_reference_count as usize {
            w.write_u32(self.var_reference_index.get(i).copied().unwrap_or(0));
        }
        w.write_u32(self.var_reference_count);
        for i in 0..self.var_reference_count as usize {
            w.write_pointer(self.var_reference.get(i).and_then(|v| v.as_ref()))?;
        }
        w.write_deferred()?;
        Ok(())
    }

    fn unmarshal_ndr_request(&mut self, r: &mut NdrReader) -> Result<()> {
        let this = OrpcThis::read_repr(r)?;
        r.read_deferred()?;
        self.this = OrpcThis::take_repr(this, r)?;
        self.dispatch_id_member = r.read_i32()?;
        self.iid = Uuid::unmarshal_ndr(r)?;
        self.locale_id = r.read_u32()?;
        self.flags = r.read_u32()?;
        let params = DispParams::read_repr(r)?;
        r.read_deferred()?;
        self.dispatch_params = DispParams::take_repr(params, r)?;
        self.var_reference_count = r.read_u32()?;
        let index_count = r.read_size(4)?;
        self.var_reference_index = Vec::with_capacity(index_count);
        for _ in 0..index_count {
            self.var_reference_index.push(r.read_u32()?);
        }
        let var_count = r.read_size(4)?;
        let mut handles = Vec::with_capacity(var_count);
        for _ in 0..var_count {
            handles.push(r.read_pointer::<Variant>()?);
        }
        r.read_deferred()?;
        self.var_reference = Vec::with_capacity(var_count);
        for handle in handles {
            self.var_reference.push(handle.take(r)?);
        }
        Ok(())
    }

    fn marshal_ndr_response(&mut self, w: &mut NdrWriter) -> Result<()> {
        self.prepare_response_payload()?;
        self.that.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_pointer(self.var_result.as_ref())?;
        w.write_deferred()?;
        self.exception_info.marshal_ndr(w)?;
        w.write_deferred()?;
        w.write_u32(self.arg_error);
        // rgVarRef is a conformant array sized by the request's cVarRef,
        // null-filled past the stored elements
        w.write_u32(self.var_reference_count);
        for i in 0..self.var_reference_count as usize {
            w.write_pointer(self.var_reference.get(i).and_then(|v| v.as_ref()))?;
        }
        w.write_deferred()?;
        w.write_i32(self.return_code);
        Ok(())
    }

    fn unmarshal_ndr_response(&mut self, r: &mut NdrReader) -> Result<()> {
        let that = OrpcThat::read_repr(r)?;
        r.read_deferred()?;
        self.that = OrpcThat::take_repr(that, r)?;
        let var_result = r.read_pointer::<Variant>()?;
        r.read_deferred()?;
        self.var_result = var_result.take(r)?;
        let excep = ExcepInfo::read_repr(r)?;
        r.read_deferred()?;
        self.exception_info = ExcepInfo::take_repr(excep, r)?;
        self.arg_error = r.read_u32()?;
        let slots = VariantSlots::read_repr(r)?;
        r.read_deferred()?;
        self.var_reference = VariantSlots::take_repr(slots, r)?.0;
        self.var_reference_count = self.var_reference.len() as u32;
        self.return_code = r.read_i32()?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct InvokeRequest {
    pub this: OrpcThis,
    pub dispatch_id_member: i32,
    pub iid: Uuid,
    pub locale_id: u32,
    pub flags: u32,
    pub dispatch_params: DispParams,
    pub var_reference_count: u32,
    pub var_reference_index: Vec<u32>,
    pub var_reference: Vec<Option<Variant>>,
}

impl InvokeRequest {
    pub fn to_op(&self) -> InvokeOperation {
        InvokeOperation {
            this: self.this.clone(),
            dispatch_id_member: self.dispatch_id_member,
            iid: self.iid,
            locale_id: self.locale_id,
            flags: self.flags,
            dispatch_params: self.dispatch_params.clone(),
            var_reference_count: self.var_reference_count,
            var_reference_index: self.var_reference_index.clone(),
            var_reference: self.var_reference.clone(),
            ..Default::default()
        }
    }

    pub fn from_op(op: &InvokeOperation) -> Self {
        Self {
            this: op.this.clone(),
            dispatch_id_member: op.dispatch_id_member,
            iid: op.iid,
            locale_id: op.locale_id,
            flags: op.flags,
            dispatch_params: op.dispatch_params.clone(),
            var_reference_count: op.var_reference_count,
            var_reference_index: op.var_reference_index.clone(),
            var_reference: op.var_reference.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InvokeResponse {
    pub that: OrpcThat,
    pub var_result: Option<Variant>,
    pub exception_info: ExcepInfo,
    pub arg_error: u32,
    pub var_reference: Vec<Option<Variant>>,
    pub return_code: i32,
}

impl InvokeResponse {
    pub fn to_op(&self, op: &mut InvokeOperation) {
        op.that = self.that.clone();
        op.var_result = self.var_result.clone();
        op.exception_info = self.exception_info.clone();
        op.arg_error = self.arg_error;
        op.var_reference = self.var_reference.clone();
        op.return_code = self.return_code;
    }

    pub fn from_op(op: &InvokeOperation) -> Self {
        Self {
            that: op.that.clone(),
            var_result: op.var_result.clone(),
            exception_info: op.exception_info.clone(),
            arg_error: op.arg_error,
            var_reference: op.var_reference.clone(),
            return_code: op.return_code,
        }
    }
}
